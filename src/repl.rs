use std::cell::RefCell;

use crate::argstack::ArgStack;
use crate::containers::{Container, IndexedContainer};
use crate::dump::{Dump, DumpContext};
use crate::error::{err_parser, RuntimeError};
use crate::list::List;
use crate::value::Value;

/// Split a line into whitespace separated tokens, keeping double-quoted text together
fn tokenize(line: &str) -> Result<Vec<String>, RuntimeError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let mut text = String::from("\"");
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('n') => text.push('\n'),
                        Some(escaped) => text.push(escaped),
                        None => return Err(err_parser("unterminated string")),
                    },
                    Some(c) => text.push(c),
                    None => return Err(err_parser("unterminated string")),
                }
            }
            tokens.push(text);
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(word);
        }
    }

    Ok(tokens)
}

/// Interpret a token as a literal value. Quoted tokens carry a leading '"' from `tokenize`.
fn literal(token: &str) -> Value {
    if token.starts_with('"') {
        return Value::text(&token[1..]);
    }

    match token {
        "nil" => Value::Nil,
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => {
            if let Ok(n) = token.parse::<i64>() {
                Value::Int(n)
            } else if let Ok(n) = token.parse::<f64>() {
                Value::Double(n)
            } else {
                Value::text(token)
            }
        }
    }
}

fn index_arg(args: &[String], position: usize) -> Result<Value, RuntimeError> {
    args.get(position)
        .map(|token| literal(token))
        .ok_or_else(|| err_parser("missing index argument"))
}

/// Holds the list being worked on and evaluates one line at a time against it
pub struct ReadEvalPrint {
    list: RefCell<List>,
    context: DumpContext,
}

impl ReadEvalPrint {
    pub fn new() -> ReadEvalPrint {
        ReadEvalPrint {
            list: RefCell::new(List::new()),
            context: DumpContext::new(),
        }
    }

    /// The list lines are currently evaluated against
    pub fn current(&self) -> List {
        self.list.borrow().clone()
    }

    /// Evaluate a line, returning any text to print
    pub fn eval(&self, line: &str) -> Result<Option<String>, RuntimeError> {
        let tokens = tokenize(line)?;
        let (head, args) = match tokens.split_first() {
            Some((head, args)) => (head.as_str(), args),
            None => return Ok(None),
        };

        let list = self.current();

        match head {
            ":new" => {
                let mut stack = ArgStack::new();
                stack.push_marker();
                for arg in args {
                    stack.push(literal(arg));
                }
                self.list.replace(List::from_arg_stack(&mut stack)?);
                Ok(Some(format!("{}", self.current())))
            }

            ":get" => Ok(Some(format!("{:?}", list.get(index_arg(args, 0)?)?))),

            ":set" => {
                let value = args
                    .get(1)
                    .map(|token| literal(token))
                    .ok_or_else(|| err_parser("missing value argument"))?;
                list.set_value(index_arg(args, 0)?, value)?;
                Ok(None)
            }

            ":freeze" => {
                list.set_read_only(true);
                Ok(None)
            }

            ":thaw" => {
                list.set_read_only(false);
                Ok(None)
            }

            ":dump" => Ok(Some(list.dump()?.to_json_pretty()?)),

            ":load" => {
                let json = line.trim_start()[head.len()..].trim();
                let dump = Dump::from_json(json)?;
                self.list.replace(List::create_from_dump(&self.context, &dump)?);
                Ok(Some(format!("{}", self.current())))
            }

            ":suffixes" => Ok(Some(list.suffix_names().join(" "))),

            ":count" => Ok(Some(format!("{}", list.count()))),

            _ if head.starts_with(':') => Err(err_parser(&format!("unknown command {}", head))),

            name => {
                let args = args.iter().map(|token| literal(token)).collect();
                let result = list.call_suffix(name, args)?;
                if result.is_nil() {
                    Ok(Some(format!("{}", list)))
                } else {
                    Ok(Some(format!("{:?}", result)))
                }
            }
        }
    }

    /// Evaluate and print, reporting script errors without stopping
    pub fn run(&self, line: &str) -> Result<(), RuntimeError> {
        match self.eval(line) {
            Ok(Some(output)) => println!("{}", output),
            Ok(None) => (),
            Err(e) => {
                if e.is_script_error() {
                    println!("error: {}", e);
                } else {
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

impl Default for ReadEvalPrint {
    fn default() -> ReadEvalPrint {
        ReadEvalPrint::new()
    }
}
