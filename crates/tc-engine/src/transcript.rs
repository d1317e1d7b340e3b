//! Transcript format: one command per line, for scripted drivers and replay.
//!
//! ```text
//! # triangle
//! drawVertex id=A x=200 y=200 label=A
//! drawEdge from=A to=B weight=4 directed=true
//! annotate target=A text="degree 2" position=top
//! ```
//!
//! Built on `winnow` 0.7. Values are bare words or double-quoted strings
//! (`\"`, `\\`, `\n` escapes); each is coerced to the type the named
//! parameter expects, so `label=1` stays a string and `x=1` is a number.

use crate::commands::Command;
use serde_json::{Map, Number, Value};
use tc_core::model::{Graph, format_number};
use winnow::ascii::{space0, space1};
use winnow::combinator::{alt, delimited, preceded, repeat, separated_pair, terminated};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_while};

const NUMBER_PARAMS: &[&str] = &["x", "y", "weight", "duration"];
const BOOL_PARAMS: &[&str] = &["directed"];

/// Parse a transcript into commands.
///
/// # Errors
/// Returns `line N: ...` for the first line that does not parse or whose
/// arguments do not fit the command.
pub fn parse_transcript(input: &str) -> Result<Vec<Command>, String> {
    let mut commands = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = parse_command_line(line).map_err(|e| format!("line {}: {e}", idx + 1))?;
        commands.push(command);
    }
    Ok(commands)
}

/// Parse a single transcript line.
///
/// # Errors
/// Returns a description of what did not parse.
pub fn parse_command_line(line: &str) -> Result<Command, String> {
    let mut rest = line.trim();
    let (name, args) = parse_line
        .parse_next(&mut rest)
        .map_err(|e| format!("syntax error: {e}"))?;
    if !rest.is_empty() {
        return Err(format!("unexpected `{rest}`"));
    }

    let mut arguments = Map::new();
    for (key, raw) in args {
        arguments.insert(key.to_string(), coerce(key, raw)?);
    }
    Command::from_parts(name, Value::Object(arguments))
}

// ─── Low-level parsers ──────────────────────────────────────────────────

#[derive(Debug)]
enum RawValue<'a> {
    Quoted(String),
    Bare(&'a str),
}

enum Piece<'a> {
    Plain(&'a str),
    Escaped(char),
}

type Args<'a> = Vec<(&'a str, RawValue<'a>)>;

fn parse_line<'a>(input: &mut &'a str) -> ModalResult<(&'a str, Args<'a>)> {
    terminated(
        (parse_name, repeat(0.., preceded(space1, parse_arg))),
        space0,
    )
    .parse_next(input)
}

fn parse_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '-' || c == '_').parse_next(input)
}

fn parse_key<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

fn parse_arg<'a>(input: &mut &'a str) -> ModalResult<(&'a str, RawValue<'a>)> {
    separated_pair(parse_key, '=', parse_value).parse_next(input)
}

fn parse_value<'a>(input: &mut &'a str) -> ModalResult<RawValue<'a>> {
    alt((
        parse_quoted.map(RawValue::Quoted),
        parse_bare.map(RawValue::Bare),
    ))
    .parse_next(input)
}

fn parse_bare<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| !c.is_whitespace() && c != '"').parse_next(input)
}

fn plain_chunk<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_till(1.., |c: char| c == '"' || c == '\\').parse_next(input)
}

fn escaped(input: &mut &str) -> ModalResult<char> {
    preceded('\\', any)
        .map(|c: char| if c == 'n' { '\n' } else { c })
        .parse_next(input)
}

fn parse_quoted(input: &mut &str) -> ModalResult<String> {
    let pieces: Vec<Piece<'_>> = delimited(
        '"',
        repeat(
            0..,
            alt((plain_chunk.map(Piece::Plain), escaped.map(Piece::Escaped))),
        ),
        '"',
    )
    .parse_next(input)?;

    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Plain(s) => out.push_str(s),
            Piece::Escaped(c) => out.push(c),
        }
    }
    Ok(out)
}

fn coerce(key: &str, raw: RawValue<'_>) -> Result<Value, String> {
    let text = match raw {
        RawValue::Quoted(s) => s,
        RawValue::Bare(s) => s.to_string(),
    };
    if NUMBER_PARAMS.contains(&key) {
        let n: f64 = text
            .parse()
            .map_err(|_| format!("`{key}` expects a number, got `{text}`"))?;
        return Number::from_f64(n)
            .map(Value::Number)
            .ok_or_else(|| format!("`{key}` must be finite, got `{text}`"));
    }
    if BOOL_PARAMS.contains(&key) {
        return match text.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(format!("`{key}` expects true or false, got `{text}`")),
        };
    }
    Ok(Value::String(text))
}

// ─── Emitter ─────────────────────────────────────────────────────────────

/// Emit one command as a transcript line.
pub fn emit_command(command: &Command) -> String {
    match command {
        Command::DrawVertex { id, x, y, label } => format!(
            "drawVertex id={} x={} y={} label={}",
            word(id),
            format_number(*x),
            format_number(*y),
            word(label)
        ),
        Command::DrawEdge {
            from,
            to,
            weight,
            directed,
        } => {
            let mut line = format!("drawEdge from={} to={}", word(from), word(to));
            if let Some(w) = weight {
                line.push_str(&format!(" weight={}", format_number(*w)));
            }
            if *directed {
                line.push_str(" directed=true");
            }
            line
        }
        Command::ClearCanvas {} => "clearCanvas".to_string(),
        Command::Annotate {
            target,
            text,
            position,
        } => format!(
            "annotate target={} text={} position={}",
            word(target),
            word(text),
            word(position)
        ),
        Command::ShowFormula { latex, x, y } => format!(
            "showFormula latex={} x={} y={}",
            word(latex),
            format_number(*x),
            format_number(*y)
        ),
        Command::Highlight {
            element_ids,
            color,
            duration,
        } => {
            let mut line = format!("highlight elementIds={}", word(element_ids));
            if let Some(c) = color {
                line.push_str(&format!(" color={}", word(c)));
            }
            if let Some(d) = duration {
                line.push_str(&format!(" duration={}", format_number(*d)));
            }
            line
        }
    }
}

impl Command {
    /// This command as a transcript line.
    pub fn to_line(&self) -> String {
        emit_command(self)
    }
}

/// The create commands that rebuild `graph` on an empty canvas, in order.
pub fn replay_commands(graph: &Graph) -> Vec<Command> {
    let vertices = graph.vertices.iter().map(|v| Command::DrawVertex {
        id: v.id.as_str().to_string(),
        x: v.x,
        y: v.y,
        label: v.label.clone(),
    });
    let edges = graph.edges.iter().map(|e| Command::DrawEdge {
        from: e.from.as_str().to_string(),
        to: e.to.as_str().to_string(),
        weight: e.weight,
        directed: e.directed,
    });
    vertices.chain(edges).collect()
}

/// Transcript text that rebuilds `graph`.
pub fn transcript_for_graph(graph: &Graph) -> String {
    let mut out = String::new();
    for command in replay_commands(graph) {
        out.push_str(&emit_command(&command));
        out.push('\n');
    }
    out
}

/// Bare when unambiguous, quoted otherwise.
fn word(s: &str) -> String {
    let bare = !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\');
    if bare {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
