use autotemplate::Notifier;
use std::io::{IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Create a StandardStream with appropriate color support
///
/// Follows the termcolor recommended pattern:
/// - Respects user preference from --color flag
/// - When Auto, checks IsTerminal to disable for pipes/redirects
/// - ColorChoice::Auto also respects NO_COLOR environment variable
pub fn create_stdout(preference: ColorChoice) -> StandardStream {
    let choice = if preference == ColorChoice::Auto && !std::io::stdout().is_terminal() {
        ColorChoice::Never
    } else {
        preference
    };
    StandardStream::stdout(choice)
}

/// Same as [`create_stdout`], for stderr
pub fn create_stderr(preference: ColorChoice) -> StandardStream {
    let choice = if preference == ColorChoice::Auto && !std::io::stderr().is_terminal() {
        ColorChoice::Never
    } else {
        preference
    };
    StandardStream::stderr(choice)
}

/// Warning color: yellow + bold
pub fn warning() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Yellow)).set_bold(true);
    spec
}

/// Success color: green
pub fn success() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Green));
    spec
}

/// Highlight color: cyan (for paths)
pub fn highlight() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Cyan));
    spec
}

/// Dim color: gray (for secondary info)
pub fn dim() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_dimmed(true);
    spec
}

/// Print one line in the given colour, resetting afterwards
pub fn print_line(stream: &mut StandardStream, spec: &ColorSpec, text: &str) {
    // Terminal output is best-effort.
    let _ = stream.set_color(spec);
    let _ = write!(stream, "{}", text);
    let _ = stream.reset();
    let _ = writeln!(stream);
}

/// Shows notices on stderr in the warning colour
pub struct TerminalNotifier {
    color: ColorChoice,
}

impl TerminalNotifier {
    pub fn new(color: ColorChoice) -> Self {
        Self { color }
    }
}

impl Notifier for TerminalNotifier {
    fn notice(&self, message: &str) {
        let mut stderr = create_stderr(self.color);
        print_line(&mut stderr, &warning(), message);
    }
}
