use std::fmt;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::str::FromStr;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/lunchwheel.sock";

/// One line of the daemon's socket protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonCommand {
    Show,
    Hide,
    Spin,
    Refresh,
    Add(String),
    Remove(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid index '{0}'")]
    InvalidIndex(String),
}

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("Failed to connect to lunchwheel daemon at {path}: {source}. Is lunchwheel running?")]
    Connect {
        path: &'static str,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FromStr for DaemonCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(v, r)| (v, r.trim()))
            .unwrap_or((line, ""));

        match verb {
            "" => Err(CommandError::Empty),
            "show" => Ok(Self::Show),
            "hide" => Ok(Self::Hide),
            "spin" => Ok(Self::Spin),
            "refresh" => Ok(Self::Refresh),
            "add" if rest.is_empty() => Err(CommandError::MissingArgument("add")),
            "add" => Ok(Self::Add(rest.to_string())),
            "remove" if rest.is_empty() => Err(CommandError::MissingArgument("remove")),
            "remove" => rest
                .parse()
                .map(Self::Remove)
                .map_err(|_| CommandError::InvalidIndex(rest.to_string())),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for DaemonCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show => write!(f, "show"),
            Self::Hide => write!(f, "hide"),
            Self::Spin => write!(f, "spin"),
            Self::Refresh => write!(f, "refresh"),
            Self::Add(label) => write!(f, "add {}", label.replace('\n', " ")),
            Self::Remove(index) => write!(f, "remove {}", index),
        }
    }
}

pub fn send(command: &DaemonCommand) -> Result<(), DaemonError> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|source| DaemonError::Connect {
        path: SOCKET_PATH,
        source,
    })?;

    writeln!(stream, "{}", command)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cases = vec![
            ("show", DaemonCommand::Show),
            ("  hide \n", DaemonCommand::Hide),
            ("spin", DaemonCommand::Spin),
            ("refresh", DaemonCommand::Refresh),
            ("add Pho Saigon", DaemonCommand::Add("Pho Saigon".to_string())),
            ("remove 3", DaemonCommand::Remove(3)),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<DaemonCommand>().unwrap(), expected);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<DaemonCommand>(), Err(CommandError::Empty));
        assert_eq!(
            "add".parse::<DaemonCommand>(),
            Err(CommandError::MissingArgument("add"))
        );
        assert_eq!(
            "remove -1".parse::<DaemonCommand>(),
            Err(CommandError::InvalidIndex("-1".to_string()))
        );
        assert_eq!(
            "dance".parse::<DaemonCommand>(),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn test_display_is_parseable() {
        let command = DaemonCommand::Add("Two\nLines".to_string());
        assert_eq!(command.to_string(), "add Two Lines");
        assert_eq!(
            command.to_string().parse::<DaemonCommand>().unwrap(),
            DaemonCommand::Add("Two Lines".to_string())
        );
    }
}
