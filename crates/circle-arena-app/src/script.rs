//! Line-based command scripts.
//!
//! One step per line:
//!
//! ```text
//! create            # add a circle
//! undo
//! redo
//! down 120 80       # left button pressed at (120, 80)
//! move 300 200      # pointer moved
//! up                # left button released
//! resize 640 480    # canvas resized
//! key Ctrl+Z        # keyboard shortcut
//! ```
//!
//! Blank lines and `#` comments are ignored.

use circle_arena_core::{Arena, Command, MouseButton, PointerEvent, ShortcutRegistry};
use kurbo::Point;
use std::path::Path;
use thiserror::Error;

/// Script errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Result type for script operations.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// A single scripted input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Command(Command),
    Down(Point),
    Move(Point),
    Up,
    Resize { width: f64, height: f64 },
}

impl Step {
    /// Parse one line. Returns None for blank lines and comments.
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.split('#').next().unwrap_or_default().trim();
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let step = match verb.to_ascii_lowercase().as_str() {
            "create" => {
                expect_args(verb, &args, 0)?;
                Step::Command(Command::CreateShape)
            }
            "undo" => {
                expect_args(verb, &args, 0)?;
                Step::Command(Command::Undo)
            }
            "redo" => {
                expect_args(verb, &args, 0)?;
                Step::Command(Command::Redo)
            }
            "down" => Step::Down(parse_point(verb, &args)?),
            "move" => Step::Move(parse_point(verb, &args)?),
            "up" => {
                expect_args(verb, &args, 0)?;
                Step::Up
            }
            "resize" => {
                let size = parse_point(verb, &args)?;
                if size.x < 0.0 || size.y < 0.0 {
                    return Err(format!("resize needs non-negative dimensions, got {} {}", size.x, size.y));
                }
                Step::Resize {
                    width: size.x,
                    height: size.y,
                }
            }
            "key" => {
                expect_args(verb, &args, 1)?;
                let command = ShortcutRegistry::resolve(args[0])
                    .ok_or_else(|| format!("no shortcut bound to '{}'", args[0]))?;
                Step::Command(command)
            }
            other => return Err(format!("unknown step '{other}'")),
        };
        Ok(Some(step))
    }
}

fn expect_args(verb: &str, args: &[&str], count: usize) -> Result<(), String> {
    if args.len() == count {
        Ok(())
    } else {
        Err(format!("'{verb}' takes {count} argument(s), got {}", args.len()))
    }
}

fn parse_point(verb: &str, args: &[&str]) -> Result<Point, String> {
    expect_args(verb, args, 2)?;
    let coord = |s: &str| {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("'{s}' is not a number"))
    };
    Ok(Point::new(coord(args[0])?, coord(args[1])?))
}

/// A parsed script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Parse a whole script, stopping at the first bad line.
    pub fn parse(source: &str) -> ScriptResult<Self> {
        let mut steps = Vec::new();
        for (index, line) in source.lines().enumerate() {
            let step = Step::parse(line).map_err(|message| ScriptError::Parse {
                line: index + 1,
                message,
            })?;
            steps.extend(step);
        }
        Ok(Self { steps })
    }

    /// Load and parse a script file.
    pub fn load(path: impl AsRef<Path>) -> ScriptResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&source)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Feed every step into the arena in order.
    pub fn run(&self, arena: &mut Arena) {
        let mut pointer = Point::ZERO;
        for step in &self.steps {
            log::trace!("Step {step:?}");
            match *step {
                Step::Command(command) => arena.execute(command),
                Step::Down(position) => {
                    pointer = position;
                    arena.handle_pointer(PointerEvent::Down {
                        position,
                        button: MouseButton::Left,
                    });
                }
                Step::Move(position) => {
                    pointer = position;
                    arena.handle_pointer(PointerEvent::Move { position });
                }
                Step::Up => arena.handle_pointer(PointerEvent::Up {
                    position: pointer,
                    button: MouseButton::Left,
                }),
                Step::Resize { width, height } => arena.set_bounds(width, height),
            }
        }
    }
}
