//! Console Commands
//!
//! One command per stdin line.

use anyhow::{Context, bail};

pub const HELP: &str = "commands: warn [secs] | extend | logout | expired | login <email> <password> | state | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Simulate the auth layer's expiration warning
    Warn(Option<u32>),
    Extend,
    Logout,
    /// Simulate the auth layer reporting an expired session
    Expired,
    Login { email: String, password: String },
    State,
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for a blank line
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "warn" => {
                let secs = words
                    .next()
                    .map(|w| w.parse::<u32>().with_context(|| format!("invalid seconds: {w}")))
                    .transpose()?;
                Command::Warn(secs)
            }
            "extend" => Command::Extend,
            "logout" => Command::Logout,
            "expired" => Command::Expired,
            "login" => {
                let (Some(email), Some(password)) = (words.next(), words.next()) else {
                    bail!("usage: login <email> <password>");
                };
                Command::Login {
                    email: email.to_string(),
                    password: password.to_string(),
                }
            }
            "state" => Command::State,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command: {other}"),
        };

        if words.next().is_some() {
            bail!("too many arguments for {name}");
        }
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(Command::parse("extend").unwrap(), Some(Command::Extend));
        assert_eq!(Command::parse("  QUIT ").unwrap(), Some(Command::Quit));
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("warn").unwrap(), Some(Command::Warn(None)));
        assert_eq!(Command::parse("warn 15").unwrap(), Some(Command::Warn(Some(15))));
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            Command::parse("login ana@tienda.es secreto").unwrap(),
            Some(Command::Login {
                email: "ana@tienda.es".into(),
                password: "secreto".into()
            })
        );
        assert!(Command::parse("login ana@tienda.es").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("dance").is_err());
        assert!(Command::parse("warn soon").is_err());
        assert!(Command::parse("logout now").is_err());
    }
}
