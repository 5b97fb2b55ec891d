//! Line-by-line driver over a numbered disassembly listing (`<index>: <instruction>`).

use std::io::{self, Write};

use crate::error::LineError;
use crate::parser::parse_instruction;
use crate::translate::Translator;

/// Instruction text of a listing line: everything after the first `:`.
///
/// Returns `None` for lines that carry no instruction (no colon, or nothing after it).
pub fn strip_line_index(line: &str) -> Option<&str> {
    let (_, text) = line.split_once(':')?;
    let text = text.trim();
    (!text.is_empty()).then_some(text)
}

/// Lex, parse and translate one instruction text into a `;`-terminated statement.
pub fn feed(text: &str, translator: &Translator) -> Result<String, LineError> {
    let node = parse_instruction(text)?.into_node()?;
    translator.statement(&node)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedLine {
    /// 1-based line number in the listing.
    pub line_number: usize,
    /// The listing's own index (text before the colon).
    pub index: String,
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line_number: usize,
    pub error: LineError,
}

impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.error)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingOutput {
    pub statements: Vec<TranslatedLine>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ListingOutput {
    pub fn write_statements<W: Write>(&self, mut out: W) -> io::Result<()> {
        for line in &self.statements {
            writeln!(out, "{}", line.statement)?;
        }
        Ok(())
    }

    pub fn write_diagnostics<W: Write>(&self, mut out: W) -> io::Result<()> {
        for diag in &self.diagnostics {
            writeln!(out, "{diag}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListingTranslator {
    translator: Translator,
}

impl ListingTranslator {
    pub fn new(translator: Translator) -> Self {
        Self { translator }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Translate every instruction line. A failing line is recorded and skipped; it never stops
    /// the lines after it.
    pub fn translate_listing(&self, source: &str) -> ListingOutput {
        let mut output = ListingOutput::default();
        for (idx, raw) in source.lines().enumerate() {
            let line_number = idx + 1;
            let Some(text) = strip_line_index(raw) else {
                continue;
            };
            match feed(text, &self.translator) {
                Ok(statement) => {
                    tracing::debug!(line_number, %statement, "translated");
                    let index = raw.split_once(':').map_or("", |(i, _)| i.trim());
                    output.statements.push(TranslatedLine {
                        line_number,
                        index: index.to_owned(),
                        statement,
                    });
                }
                Err(error) => {
                    if error.is_unimplemented() {
                        tracing::warn!(line_number, %error, "skipping line");
                    } else {
                        tracing::warn!(line_number, %error, text, "malformed instruction");
                    }
                    output.diagnostics.push(Diagnostic { line_number, error });
                }
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_index_prefix() {
        assert_eq!(strip_line_index("   3: mul r0.w, r0.w, v5.w"), Some("mul r0.w, r0.w, v5.w"));
        assert_eq!(strip_line_index("ps_4_0"), None);
        assert_eq!(strip_line_index("12:   "), None);
        // Only the first colon splits.
        assert_eq!(strip_line_index("1: a:b"), Some("a:b"));
    }

    #[test]
    fn unknown_mnemonic_does_not_stop_the_listing() {
        let source = "0: mov r0.x, v0.x\n1: foo r1, r0\n2: add r2.xy, r0.xxxx, v1.xyzw\n";
        let out = ListingTranslator::default().translate_listing(source);
        let statements: Vec<_> = out.statements.iter().map(|l| l.statement.as_str()).collect();
        assert_eq!(
            statements,
            ["float r0.x = v0.x;", "float2 r2.xy = r0.xx + v1.xy;"]
        );
        assert_eq!(out.statements[1].index, "2");
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic {
                line_number: 2,
                error: LineError::UnknownMnemonic {
                    name: "foo".to_owned()
                },
            }]
        );
    }

    #[test]
    fn writes_newline_terminated_statements() {
        let out = ListingTranslator::default().translate_listing("0: mov r0.x, v0.x\n1: ret\n");
        let mut buf = Vec::new();
        out.write_statements(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "float r0.x = v0.x;\n");

        let mut diag = Vec::new();
        out.write_diagnostics(&mut diag).unwrap();
        assert_eq!(
            String::from_utf8(diag).unwrap(),
            "line 2: no implementation for `ret`\n"
        );
    }
}
