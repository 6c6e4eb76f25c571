//! `DEFCHR$` program files (`.bas` tokenized, `.asc` plain text).
//!
//! Every character becomes one BASIC line
//! `DEFCHR$(<code>)=HEXCHR$("<48 hex digits>")` where the hex string is the
//! plane-major character data.
//!
//! Tokenized layout of a physical line:
//!
//! ```text
//! [link: u16 le][line number: u16 le][body ...][0x00]
//! ```
//!
//! `link` counts the bytes from its own position to the next link. A link of
//! zero ends the program.
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{PcgError, Result},
    raw::range_len,
    store::{CharacterStore, CHAR_COUNT, CHAR_SIZE},
};

pub const DEFCHR: u8 = 0xB2;
pub const STRING_PREFIX: u8 = 0xFF;
pub const FUNC_CALL: u8 = 0xA0;
pub const LPAREN: u8 = 0x28;
pub const RPAREN: u8 = 0x29;
pub const EQUAL: u8 = 0xF4;
pub const HEXCHR: u8 = 0xBF;
pub const QUOTE: u8 = 0x22;
pub const INT16_PREFIX: u8 = 0x12;
pub const LINE_TERMINATOR: u8 = 0x00;

/// `DEFCHR$` statement token.
pub const DEFCHR_TOKEN: [u8; 3] = [STRING_PREFIX, FUNC_CALL, DEFCHR];
/// `HEXCHR$` function token.
pub const HEXCHR_TOKEN: [u8; 2] = [STRING_PREFIX, HEXCHR];

const HEX_LEN: usize = CHAR_SIZE * 2;
/// link + line number
const LINE_HEADER_LEN: usize = 4;

static ASCII_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"DEFCHR\$\(\s*([0-9]+)\s*\)\s*=\s*HEXCHR\$\(\s*"([0-9A-Fa-f]+)"\s*\)"#)
        .expect("static regex")
});

/// How loaded lines pick their target character.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadMode {
    /// Use the code written in each line.
    #[default]
    Original,
    /// Ignore embedded codes; fill consecutively from the caller's start code.
    Start,
}

impl FromStr for LoadMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(LoadMode::Original),
            "start" => Ok(LoadMode::Start),
            other => Err(format!("unknown load mode '{other}'")),
        }
    }
}

/// Line numbering used when saving.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProgramOptions {
    pub base_line: u16,
    pub line_step: u16,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            base_line: 60000,
            line_step: 10,
        }
    }
}

impl ProgramOptions {
    fn line_number(&self, index: usize) -> u16 {
        self.base_line
            .wrapping_add(self.line_step.wrapping_mul(index as u16))
    }
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

/// Decodes an even-length hex string; the caller has already validated the digits.
fn decode_hex(hex: &[u8]) -> Option<Vec<u8>> {
    hex.chunks_exact(2)
        .map(|pair| {
            let s = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(s, 16).ok()
        })
        .collect()
}

pub fn save_ascii(store: &CharacterStore, start: usize, end: usize) -> Result<String> {
    save_ascii_with(store, start, end, &ProgramOptions::default())
}

pub fn save_ascii_with(
    store: &CharacterStore,
    start: usize,
    end: usize,
    options: &ProgramOptions,
) -> Result<String> {
    range_len(start, end)?;
    let mut out = String::new();
    for (i, code) in (start..=end).enumerate() {
        out.push_str(&format!(
            "{}DEFCHR$({})=HEXCHR$(\"{}\")\r",
            options.line_number(i),
            code,
            hex_string(store.get_character(code as u8))
        ));
    }
    Ok(out)
}

pub fn save_binary(store: &CharacterStore, start: usize, end: usize) -> Result<Vec<u8>> {
    save_binary_with(store, start, end, &ProgramOptions::default())
}

pub fn save_binary_with(
    store: &CharacterStore,
    start: usize,
    end: usize,
    options: &ProgramOptions,
) -> Result<Vec<u8>> {
    let count = range_len(start, end)?;
    let mut out = Vec::with_capacity(count * 68 + 2);
    for (i, code) in (start..=end).enumerate() {
        let body = line_body(code as u16, store.get_character(code as u8));
        let link = (LINE_HEADER_LEN + body.len()) as u16;
        out.extend(link.to_le_bytes());
        out.extend(options.line_number(i).to_le_bytes());
        out.extend(body);
    }
    out.extend([0, 0]);
    Ok(out)
}

/// Tokenized statement including the line terminator.
fn line_body(code: u16, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(64);
    body.extend(DEFCHR_TOKEN);
    body.push(LPAREN);
    body.push(INT16_PREFIX);
    body.extend(code.to_le_bytes());
    body.push(RPAREN);
    body.push(EQUAL);
    body.extend(HEXCHR_TOKEN);
    body.push(LPAREN);
    body.push(QUOTE);
    body.extend(hex_string(data).bytes());
    body.push(QUOTE);
    body.push(RPAREN);
    body.push(LINE_TERMINATOR);
    body
}

/// Loads a program, tokenized if the data contains a NUL byte, plain text otherwise.
///
/// Malformed lines are skipped. Returns the number of characters written.
pub fn load(bytes: &[u8], store: &mut CharacterStore, start: usize, mode: LoadMode) -> Result<usize> {
    if bytes.contains(&0) {
        load_binary(bytes, store, start, mode)
    } else {
        load_ascii(&String::from_utf8_lossy(bytes), store, start, mode)
    }
}

/// Target resolution shared by both loaders.
struct Sink<'a> {
    store: &'a mut CharacterStore,
    mode: LoadMode,
    next: usize,
    written: usize,
}

impl<'a> Sink<'a> {
    /// `start` only matters in [`LoadMode::Start`].
    fn new(store: &'a mut CharacterStore, start: usize, mode: LoadMode) -> Result<Self> {
        if mode == LoadMode::Start && start >= CHAR_COUNT {
            return Err(PcgError::InvalidRange { start, end: start });
        }
        Ok(Self {
            store,
            mode,
            next: start,
            written: 0,
        })
    }

    fn exhausted(&self) -> bool {
        self.mode == LoadMode::Start && self.next >= CHAR_COUNT
    }

    fn accept(&mut self, line: usize, embedded: u64, data: &[u8]) -> Result<()> {
        let target = match self.mode {
            LoadMode::Original => embedded,
            LoadMode::Start => {
                self.next += 1;
                (self.next - 1) as u64
            }
        };
        if target >= CHAR_COUNT as u64 {
            log::warn!("program line {line}: character code {target} out of range, skipped");
            return Ok(());
        }
        self.store.set_character(target as u8, data)?;
        self.written += 1;
        Ok(())
    }
}

pub fn load_ascii(text: &str, store: &mut CharacterStore, start: usize, mode: LoadMode) -> Result<usize> {
    let mut sink = Sink::new(store, start, mode)?;
    let mut seen = 0;
    let lines = text.split(['\r', '\n']).filter(|l| !l.trim().is_empty());
    for (line_no, line) in lines.enumerate() {
        if sink.exhausted() {
            log::debug!("program load: character bank full, remaining lines ignored");
            break;
        }
        seen += 1;
        let Some(caps) = ASCII_LINE.captures(line) else {
            log::debug!("program line {line_no}: no DEFCHR$ statement");
            continue;
        };
        let hex = &caps[2];
        if hex.len() != HEX_LEN {
            log::warn!(
                "program line {line_no}: expected {HEX_LEN} hex digits, got {}",
                hex.len()
            );
            continue;
        }
        let Some(data) = decode_hex(hex.as_bytes()) else {
            continue;
        };
        let embedded = caps[1].parse::<u64>().unwrap_or(u64::MAX);
        sink.accept(line_no, embedded, &data)?;
    }
    log::debug!("program load (text): {seen} lines, {} characters", sink.written);
    Ok(sink.written)
}

pub fn load_binary(bytes: &[u8], store: &mut CharacterStore, start: usize, mode: LoadMode) -> Result<usize> {
    let mut sink = Sink::new(store, start, mode)?;
    let mut offset = 0;
    let mut line_index = 0;
    let mut broken = false;
    while offset + 2 <= bytes.len() {
        let link = u16::from_le_bytes([bytes[offset], bytes[offset + 1]]) as usize;
        if link == 0 {
            break;
        }
        if link <= LINE_HEADER_LEN || offset + link > bytes.len() {
            log::warn!("program line {line_index}: broken link {link} at offset {offset}");
            broken = true;
            break;
        }
        if sink.exhausted() {
            log::debug!("program load: character bank full, remaining lines ignored");
            break;
        }
        let line = &bytes[offset..offset + link];
        let line_number = u16::from_le_bytes([line[2], line[3]]);
        match parse_tokenized(&line[LINE_HEADER_LEN..]) {
            Some((code, data)) => sink.accept(line_number as usize, code as u64, &data)?,
            None => log::warn!("program line {line_number}: not a DEFCHR$ statement, skipped"),
        }
        offset += link;
        line_index += 1;
    }
    if broken && sink.written == 0 {
        return Err(PcgError::MalformedProgram(format!(
            "line chain broken at offset {offset}"
        )));
    }
    log::debug!(
        "program load (tokenized): {line_index} lines, {} characters",
        sink.written
    );
    Ok(sink.written)
}

struct TokenReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> TokenReader<'a> {
    fn byte(&mut self) -> Option<u8> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    fn expect(&mut self, token: &[u8]) -> Option<()> {
        let end = self.pos + token.len();
        if self.bytes.get(self.pos..end)? != token {
            return None;
        }
        self.pos = end;
        Some(())
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let slice = self.bytes.get(self.pos..self.pos + len)?;
        self.pos += len;
        Some(slice)
    }

    /// `0x12 lo hi`, or the legacy one byte form where 0x02..=0x0A encodes `value - 1`.
    fn integer(&mut self) -> Option<u16> {
        match self.byte()? {
            INT16_PREFIX => {
                let lo = self.byte()?;
                let hi = self.byte()?;
                Some(u16::from_le_bytes([lo, hi]))
            }
            b @ 0x02..=0x0A => Some(b as u16 - 1),
            _ => None,
        }
    }
}

/// Parses one tokenized statement body; `None` on any grammar violation.
fn parse_tokenized(body: &[u8]) -> Option<(u16, Vec<u8>)> {
    let mut r = TokenReader { bytes: body, pos: 0 };
    r.expect(&DEFCHR_TOKEN)?;
    r.expect(&[LPAREN])?;
    let code = r.integer()?;
    r.expect(&[RPAREN])?;
    r.expect(&[EQUAL])?;
    r.expect(&HEXCHR_TOKEN)?;
    r.expect(&[LPAREN])?;
    r.expect(&[QUOTE])?;
    let hex = r.take(HEX_LEN)?;
    if !hex.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    r.expect(&[QUOTE])?;
    r.expect(&[RPAREN])?;
    Some((code, decode_hex(hex)?))
}
