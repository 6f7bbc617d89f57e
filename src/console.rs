// src/console.rs

//! Forwarding captured tool output to the invoking console.
//!
//! Remote tools emit UTF-8. A Windows console running a legacy code page
//! (e.g. 936 for Simplified Chinese) would show that as mojibake, so output
//! is re-encoded for the console's code page before it is written. Content is
//! never altered otherwise: if re-encoding is impossible, the original bytes
//! are written unchanged.

use std::borrow::Cow;
use std::io::{self, Write};

use encoding_rs::Encoding;
use tracing::debug;

use crate::types::ExecutionResult;

/// Code page identifier for UTF-8.
pub const UTF8_CODE_PAGE: u32 = 65001;

/// Code page of the invoking console, or `None` when no conversion applies.
#[cfg(windows)]
pub fn console_code_page() -> Option<u32> {
    // SAFETY: GetConsoleCP takes no arguments and only reads process state.
    let cp = unsafe { windows_sys::Win32::System::Console::GetConsoleCP() };
    (cp != 0).then_some(cp)
}

/// Code page of the invoking console, or `None` when no conversion applies.
#[cfg(not(windows))]
pub fn console_code_page() -> Option<u32> {
    None
}

/// Map a Windows code page identifier to an encoder.
pub fn encoding_for_code_page(code_page: u32) -> Option<&'static Encoding> {
    let encoding = match code_page {
        866 => encoding_rs::IBM866,
        874 => encoding_rs::WINDOWS_874,
        932 => encoding_rs::SHIFT_JIS,
        936 => encoding_rs::GBK,
        949 => encoding_rs::EUC_KR,
        950 => encoding_rs::BIG5,
        1250 => encoding_rs::WINDOWS_1250,
        1251 => encoding_rs::WINDOWS_1251,
        1252 => encoding_rs::WINDOWS_1252,
        1253 => encoding_rs::WINDOWS_1253,
        1254 => encoding_rs::WINDOWS_1254,
        1255 => encoding_rs::WINDOWS_1255,
        1256 => encoding_rs::WINDOWS_1256,
        1257 => encoding_rs::WINDOWS_1257,
        1258 => encoding_rs::WINDOWS_1258,
        20866 => encoding_rs::KOI8_R,
        54936 => encoding_rs::GB18030,
        UTF8_CODE_PAGE => encoding_rs::UTF_8,
        _ => return None,
    };
    Some(encoding)
}

/// Re-encode UTF-8 `bytes` into `code_page`.
///
/// Returns `None` when the input is not UTF-8, the code page is unknown, or
/// some character has no representation in the target encoding.
pub fn transcode(bytes: &[u8], code_page: u32) -> Option<Vec<u8>> {
    let text = std::str::from_utf8(bytes).ok()?;
    let encoding = encoding_for_code_page(code_page)?;

    let (encoded, _, had_unmappable) = encoding.encode(text);
    if had_unmappable {
        return None;
    }
    Some(encoded.into_owned())
}

/// Bytes to write for a console using `code_page`.
pub fn convert_for_console(bytes: &[u8], code_page: Option<u32>) -> Cow<'_, [u8]> {
    match code_page {
        Some(cp) if cp != UTF8_CODE_PAGE => match transcode(bytes, cp) {
            Some(converted) => Cow::Owned(converted),
            None => {
                debug!(code_page = cp, "output conversion failed; writing original bytes");
                Cow::Borrowed(bytes)
            }
        },
        _ => Cow::Borrowed(bytes),
    }
}

/// Which streams [`forward_output`] wrote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Forwarded {
    pub stdout: bool,
    pub stderr: bool,
}

/// Write a captured result to the given streams: stdout first, then stderr,
/// each only if non-empty.
pub fn forward_output<O, E>(
    result: &ExecutionResult,
    code_page: Option<u32>,
    out: &mut O,
    err: &mut E,
) -> io::Result<Forwarded>
where
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    let mut forwarded = Forwarded::default();

    if !result.stdout.is_empty() {
        out.write_all(&convert_for_console(&result.stdout, code_page))?;
        out.flush()?;
        forwarded.stdout = true;
    }

    if !result.stderr.is_empty() {
        err.write_all(&convert_for_console(&result.stderr, code_page))?;
        err.flush()?;
        forwarded.stderr = true;
    }

    Ok(forwarded)
}
