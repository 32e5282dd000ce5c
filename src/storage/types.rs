use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Where exported records go. `-` on the command line means stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Stdout,
}

impl FromStr for OutputTarget {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => OutputTarget::Stdout,
            path => OutputTarget::File(PathBuf::from(path)),
        })
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::File(path) => write!(f, "{}", path.display()),
            OutputTarget::Stdout => write!(f, "stdout"),
        }
    }
}
