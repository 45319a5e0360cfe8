//! Text of the line protocol spoken with the worker.

use crate::consts::*;
use crate::models::SvType;

/// Single-quoted Python string literal.
pub fn python_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Python float literal. Callers are expected to have rejected non-finite values.
pub fn python_float(value: f64) -> String {
    // Debug always keeps a decimal point or exponent, both valid Python syntax
    format!("{:?}", value)
}

pub fn python_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

pub fn import_command(module: &str) -> String {
    format!("import {}", module)
}

pub fn args_command(dictionary: &str) -> String {
    format!("args = {}", dictionary)
}

pub fn train_command(entrypoint: &str, batch_size: usize, sv_type: &SvType) -> String {
    format!(
        "{}.run(args=args, batch_size={}, svtype_str={})",
        entrypoint,
        batch_size,
        python_str(sv_type.name())
    )
}

/// Reply the worker sends once a command (and any batch it consumed) has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ack {
    Success,
    Failure(String),
}

impl Ack {
    pub fn parse(line: &str) -> Option<Ack> {
        let line = line.trim_end_matches(['\n', '\r']);
        if line == ACK_SUCCESS {
            return Some(Ack::Success);
        }
        line.strip_prefix(ACK_FAILURE_PREFIX)
            .map(|rest| Ack::Failure(rest.trim().to_string()))
    }
}

/// Program run by the interpreter at launch. It executes one command per stdin line and
/// answers each on stdout with `ack` or `nck <reason>`; everything the commands print is
/// sent to stderr so acknowledgments stay on their own stream. Batch lines following a
/// training command are read by the training entrypoint from the same stdin.
pub const BOOTSTRAP: &str = r#"import sys
import traceback
_ack = sys.stdout
sys.stdout = sys.stderr
_scope = {'__name__': '__main__'}
while True:
    _line = sys.stdin.readline()
    if not _line:
        break
    try:
        exec(compile(_line, '<stdin>', 'exec'), _scope)
    except BaseException as _err:
        traceback.print_exc()
        _ack.write('nck ' + ' '.join(repr(_err).split()) + '\n')
    else:
        _ack.write('ack\n')
    _ack.flush()
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("plain", "'plain'")]
    #[case("it's", r"'it\'s'")]
    #[case(r"C:\data", r"'C:\\data'")]
    #[case("a\tb", r"'a\tb'")]
    fn test_python_str(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(python_str(input), expected);
    }

    #[rstest]
    #[case(0.01, "0.01")]
    #[case(1000.0, "1000.0")]
    #[case(1e-6, "1e-6")]
    #[case(0.999, "0.999")]
    fn test_python_float(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(python_float(value), expected);
    }

    #[test]
    fn test_commands() {
        assert_eq!(import_command("svgenotyper"), "import svgenotyper");
        assert_eq!(args_command("{ }"), "args = { }");
        assert_eq!(
            train_command("svgenotyper.train", 3, &SvType::Del),
            "svgenotyper.train.run(args=args, batch_size=3, svtype_str='DEL')"
        );
    }

    #[rstest]
    #[case("ack\n", Some(Ack::Success))]
    #[case("nck ValueError('boom')\n", Some(Ack::Failure("ValueError('boom')".to_string())))]
    #[case("garbage\n", None)]
    fn test_ack_parse(#[case] line: &str, #[case] expected: Option<Ack>) {
        assert_eq!(Ack::parse(line), expected);
    }
}
