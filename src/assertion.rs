use std::fmt;

use crate::error::{Error, Result};
use crate::selectors::ElementInfo;

/// The property an assertion checks, independent of negation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Exist,
    Visible,
    Empty,
    Text(String),
    Contain(String),
    Attr { name: String, value: Option<String> },
    Class(String),
    Match(String),
    Disabled,
    Value(String),
    Checked,
    Length(usize),
}

/// A parsed `should()` condition such as `not.have.attr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    pub negated: bool,
    pub check: Check,
}

impl Assertion {
    /// Parse a chainer and its arguments.
    ///
    /// Fails with [`Error::MissingCondition`]-style configuration errors; the
    /// caller attaches the component id for an empty condition.
    pub fn parse(condition: &str, args: &[&str]) -> Result<Self> {
        let trimmed = condition.trim();
        let (negated, chainer) = match trimmed.strip_prefix("not.") {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let arity = |expected: &'static str, ok: bool| -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(Error::InvalidAssertionArgs {
                    chainer: trimmed.to_string(),
                    expected,
                    got: args.len(),
                })
            }
        };
        let one = || -> Result<String> {
            arity("1", args.len() == 1)?;
            Ok(args[0].to_string())
        };

        let (negated, check) = match chainer {
            "exist" => {
                arity("0", args.is_empty())?;
                (negated, Check::Exist)
            }
            "be.visible" => {
                arity("0", args.is_empty())?;
                (negated, Check::Visible)
            }
            "be.hidden" => {
                arity("0", args.is_empty())?;
                (!negated, Check::Visible)
            }
            "be.empty" => {
                arity("0", args.is_empty())?;
                (negated, Check::Empty)
            }
            "have.text" => (negated, Check::Text(one()?)),
            "contain" | "contain.text" | "include.text" => (negated, Check::Contain(one()?)),
            "have.attr" => {
                arity("1 or 2", matches!(args.len(), 1 | 2))?;
                (
                    negated,
                    Check::Attr {
                        name: args[0].to_string(),
                        value: args.get(1).map(|v| v.to_string()),
                    },
                )
            }
            "have.class" => (negated, Check::Class(one()?)),
            "match" => (negated, Check::Match(one()?)),
            "be.disabled" => {
                arity("0", args.is_empty())?;
                (negated, Check::Disabled)
            }
            "be.enabled" => {
                arity("0", args.is_empty())?;
                (!negated, Check::Disabled)
            }
            "have.value" => (negated, Check::Value(one()?)),
            "be.checked" => {
                arity("0", args.is_empty())?;
                (negated, Check::Checked)
            }
            "have.length" => {
                let raw = one()?;
                let n = raw.parse().map_err(|_| Error::InvalidAssertionArgs {
                    chainer: trimmed.to_string(),
                    expected: "1 numeric",
                    got: args.len(),
                })?;
                (negated, Check::Length(n))
            }
            _ => return Err(Error::UnknownAssertion(trimmed.to_string())),
        };

        Ok(Self { negated, check })
    }

    /// Selector the driver must test each element against, if any.
    pub fn match_selector(&self) -> Option<&str> {
        match &self.check {
            Check::Match(selector) => Some(selector),
            _ => None,
        }
    }

    /// Evaluate against a snapshot of the resolved elements.
    ///
    /// `subject` names the elements in the failure message.
    pub fn evaluate(&self, subject: &str, elements: &[ElementInfo]) -> std::result::Result<(), String> {
        if !matches!(self.check, Check::Exist | Check::Length(_)) && elements.is_empty() {
            return Err(format!(
                "Expected to find element '{}', but never found it",
                subject
            ));
        }

        let text: String = elements.iter().map(|e| e.text.as_str()).collect();
        let first = elements.first();

        let (passed, actual) = match &self.check {
            Check::Exist => (!elements.is_empty(), format!("{} element(s)", elements.len())),
            Check::Length(n) => (elements.len() == *n, format!("{} element(s)", elements.len())),
            Check::Visible => (elements.iter().any(|e| e.visible), "visibility".into()),
            Check::Empty => (
                elements.iter().all(|e| e.text.is_empty() && e.child_count == 0),
                format!("text '{}'", text),
            ),
            Check::Text(expected) => (&text == expected, format!("text '{}'", text)),
            Check::Contain(expected) => (text.contains(expected.as_str()), format!("text '{}'", text)),
            Check::Attr { name, value } => {
                let actual = first.and_then(|e| e.attribute(name));
                let passed = match (value, actual) {
                    (Some(expected), Some(actual)) => expected == actual,
                    (None, Some(_)) => true,
                    (_, None) => false,
                };
                (passed, format!("attribute {}={:?}", name, actual))
            }
            Check::Class(class) => (
                elements.iter().any(|e| e.has_class(class)),
                format!("class {:?}", first.and_then(|e| e.attribute("class"))),
            ),
            Check::Match(_) => (
                elements.iter().any(|e| e.matches.unwrap_or(false)),
                "selector match".into(),
            ),
            Check::Disabled => (elements.iter().any(|e| e.disabled), "disabled state".into()),
            Check::Value(expected) => {
                let actual = first.and_then(|e| e.value.as_deref());
                (actual == Some(expected.as_str()), format!("value {:?}", actual))
            }
            Check::Checked => (elements.iter().any(|e| e.checked), "checked state".into()),
        };

        if passed != self.negated {
            Ok(())
        } else {
            Err(format!("Expected '{}' {}, but got {}", subject, self, actual))
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let not = if self.negated { "not " } else { "" };
        match &self.check {
            Check::Exist => write!(f, "{}to exist", not),
            Check::Visible => write!(f, "{}to be visible", not),
            Check::Empty => write!(f, "{}to be empty", not),
            Check::Text(t) => write!(f, "{}to have text '{}'", not, t),
            Check::Contain(t) => write!(f, "{}to contain '{}'", not, t),
            Check::Attr { name, value: Some(v) } => {
                write!(f, "{}to have attribute {}='{}'", not, name, v)
            }
            Check::Attr { name, value: None } => write!(f, "{}to have attribute {}", not, name),
            Check::Class(c) => write!(f, "{}to have class '{}'", not, c),
            Check::Match(s) => write!(f, "{}to match '{}'", not, s),
            Check::Disabled => write!(f, "{}to be disabled", not),
            Check::Value(v) => write!(f, "{}to have value '{}'", not, v),
            Check::Checked => write!(f, "{}to be checked", not),
            Check::Length(n) => write!(f, "{}to have length {}", not, n),
        }
    }
}
