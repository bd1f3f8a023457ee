use std::ops::BitOr;

use crossterm::event::{KeyCode, KeyModifiers};

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, multispace0, multispace1, satisfy},
    combinator::{eof, map, map_res, value},
    multi::{many0, separated_list1},
    IResult,
};

use super::KeyPress;

fn parse_modifier(input: &str) -> IResult<&str, KeyModifiers> {
    /*
     * Parse the modifier prefixes in things like C-x, M-x, S-<left>, s-a and H-a.
     *
     * Emacs also has A- for a separate Alt key, but terminals report Meta
     * as Alt, so M- is what maps to KeyModifiers::ALT here.
     */
    alt((
        value(KeyModifiers::CONTROL, tag("C-")),
        value(KeyModifiers::ALT, tag("M-")),
        value(KeyModifiers::SHIFT, tag("S-")),
        value(KeyModifiers::SUPER, tag("s-")),
        value(KeyModifiers::HYPER, tag("H-")),
    ))(input)
}

fn parse_word(input: &str) -> IResult<&str, KeyCode> {
    alt((
        value(KeyCode::Enter, tag("RET")),
        value(KeyCode::Tab, tag("TAB")),
        value(KeyCode::Char(' '), tag("SPC")),
        value(KeyCode::Esc, tag("ESC")),
        value(KeyCode::Backspace, tag("DEL")),
        value(KeyCode::Char('\n'), tag("LFD")),
        value(KeyCode::Null, tag("NUL")),
    ))(input)
}

fn parse_arrow(input: &str) -> IResult<&str, KeyCode> {
    alt((
        value(KeyCode::Left, tag("left")),
        value(KeyCode::Right, tag("right")),
        value(KeyCode::Up, tag("up")),
        value(KeyCode::Down, tag("down")),
    ))(input)
}

fn parse_navigation(input: &str) -> IResult<&str, KeyCode> {
    alt((
        value(KeyCode::Home, tag("home")),
        value(KeyCode::End, tag("end")),
        value(KeyCode::PageUp, tag("prior")),
        value(KeyCode::PageDown, tag("next")),
        value(KeyCode::KeypadBegin, tag("begin")),
    ))(input)
}

fn parse_editing(input: &str) -> IResult<&str, KeyCode> {
    alt((
        value(KeyCode::Insert, tag("insert")),
        value(KeyCode::Delete, tag("delete")),
        value(KeyCode::Backspace, tag("backspace")),
        value(KeyCode::BackTab, tag("backtab")),
        value(KeyCode::Enter, tag("return")),
        value(KeyCode::Tab, tag("tab")),
        value(KeyCode::Esc, tag("escape")),
    ))(input)
}

fn parse_lock(input: &str) -> IResult<&str, KeyCode> {
    alt((
        value(KeyCode::CapsLock, tag("capslock")),
        value(KeyCode::ScrollLock, tag("scrolllock")),
        value(KeyCode::NumLock, tag("numlock")),
    ))(input)
}

fn parse_system(input: &str) -> IResult<&str, KeyCode> {
    alt((
        value(KeyCode::PrintScreen, tag("print")),
        value(KeyCode::Pause, tag("pause")),
        value(KeyCode::Menu, tag("menu")),
    ))(input)
}

fn parse_base10_u8(input: &str) -> Result<u8, std::num::ParseIntError> {
    input.parse::<u8>()
}

fn parse_function(input: &str) -> IResult<&str, KeyCode> {
    let (input, _) = char('f')(input)?;
    let (input, n) = map_res(digit1, parse_base10_u8)(input)?;

    Ok((input, KeyCode::F(n)))
}

fn parse_keyname(input: &str) -> IResult<&str, KeyCode> {
    alt((
        parse_arrow,
        parse_navigation,
        parse_editing,
        parse_lock,
        parse_system,
        parse_function,
    ))(input)
}

fn parse_char(input: &str) -> IResult<&str, KeyCode> {
    let (input, c) = satisfy(|c| !c.is_whitespace())(input)?;

    Ok((input, KeyCode::Char(c)))
}

/// Parse a function key name in angle brackets, which may carry its own modifiers, like
/// `<C-left>`.
fn parse_special(input: &str) -> IResult<&str, (KeyModifiers, KeyCode)> {
    let (input, _) = char('<')(input)?;
    let (input, m) = many0(parse_modifier)(input)?;
    let (input, k) = parse_keyname(input)?;
    let (input, _) = char('>')(input)?;

    let m = m.into_iter().fold(KeyModifiers::NONE, BitOr::bitor);

    Ok((input, (m, k)))
}

fn parse_plain(input: &str) -> IResult<&str, (KeyModifiers, KeyCode)> {
    map(alt((parse_word, parse_char)), |k| (KeyModifiers::NONE, k))(input)
}

pub fn parse_key(input: &str) -> IResult<&str, KeyPress> {
    let (input, m) = many0(parse_modifier)(input)?;
    let (input, (inner, k)) = alt((parse_special, parse_plain))(input)?;

    let m = m.into_iter().fold(inner, BitOr::bitor);

    Ok((input, KeyPress::new(k, m)))
}

pub fn parse_key_str(input: &str) -> IResult<&str, KeyPress> {
    let (input, _) = multispace0(input)?;
    let (input, key) = parse_key(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;

    Ok((input, key))
}

pub fn parse_chord_str(input: &str) -> IResult<&str, Vec<KeyPress>> {
    let (input, _) = multispace0(input)?;
    let (input, keys) = separated_list1(multispace1, parse_key)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;

    Ok((input, keys))
}
