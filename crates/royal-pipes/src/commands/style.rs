//! Terminal styling that honors `--color` and stdout detection.
//!
//! Every style goes through `if_supports_color`, so `--color never`, a
//! non-terminal stdout, or `NO_COLOR` yield plain text.

use std::fmt::Display;

use owo_colors::{OwoColorize, Stream::Stdout, Style};

/// Styles for stdout text.
pub(crate) trait Styled: Display + Sized {
    fn bold(&self) -> impl Display {
        self.if_supports_color(Stdout, |t| OwoColorize::bold(t))
    }

    fn dimmed(&self) -> impl Display {
        self.if_supports_color(Stdout, |t| OwoColorize::dimmed(t))
    }

    fn green(&self) -> impl Display {
        self.if_supports_color(Stdout, |t| OwoColorize::green(t))
    }

    fn yellow(&self) -> impl Display {
        self.if_supports_color(Stdout, |t| OwoColorize::yellow(t))
    }

    fn cyan(&self) -> impl Display {
        self.if_supports_color(Stdout, |t| OwoColorize::cyan(t))
    }

    /// Section heading: bold and underlined.
    fn heading(&self) -> impl Display {
        self.if_supports_color(Stdout, |t| t.style(Style::new().bold().underline()))
    }
}

impl<T: Display> Styled for T {}
