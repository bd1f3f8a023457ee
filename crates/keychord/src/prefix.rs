//! # Prefix arguments
//!
//! A prefix argument is entered before a chord to modify the command it runs, the way Emacs'
//! `C-u` does. Each press of the universal key multiplies a [PrefixArgument::Multiplier] by four,
//! and typing digits afterwards turns it into a [PrefixArgument::Number].
use std::fmt;

/// A numeric modifier for the next command.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrefixArgument {
    /// The universal key was pressed `n` times, giving a value of 4<sup>n</sup>.
    Multiplier(usize),

    /// Digits were typed after the universal key.
    Number(usize),
}

impl PrefixArgument {
    /// The argument produced by a first press of the universal key.
    pub fn universal() -> Self {
        PrefixArgument::Multiplier(4)
    }

    /// Update the argument after another press of the universal key.
    ///
    /// A multiplier is multiplied by four, while a number starts over as a fresh multiplier.
    pub fn repeat(self) -> Self {
        match self {
            PrefixArgument::Multiplier(n) => PrefixArgument::Multiplier(n.saturating_mul(4)),
            PrefixArgument::Number(_) => PrefixArgument::universal(),
        }
    }

    /// Fold a typed digit into the argument.
    ///
    /// The first digit replaces a multiplier, and later digits are appended in base 10.
    pub fn push_digit(self, digit: u32) -> Self {
        let digit = digit as usize;

        match self {
            PrefixArgument::Multiplier(_) => PrefixArgument::Number(digit),
            PrefixArgument::Number(n) => {
                PrefixArgument::Number(n.saturating_mul(10).saturating_add(digit))
            },
        }
    }

    /// The numeric value of this argument.
    pub fn count(&self) -> usize {
        match self {
            PrefixArgument::Multiplier(n) => *n,
            PrefixArgument::Number(n) => *n,
        }
    }

    /// Whether this argument was built only from presses of the universal key.
    pub fn is_multiplier(&self) -> bool {
        matches!(self, PrefixArgument::Multiplier(_))
    }
}

impl fmt::Display for PrefixArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixArgument::Multiplier(n) => write!(f, "({n})"),
            PrefixArgument::Number(n) => write!(f, "{n}"),
        }
    }
}
