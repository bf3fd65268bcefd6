use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::fs;
use std::path::Path;

use crate::ast::lower::{Lower, LowerCtx};
use crate::ast::transpile::Transpile;
use crate::err::{DwErr, FullDwErr};
use crate::span::Spanned;
use crate::{ast, estree, lexer, parser};

pub mod prelude {
    pub use super::TestLoader;
    pub use super::TestResult;

    macro_rules! load_tests {
        ($f:literal) => {
            load_tests!(tests, $f);
        };
        ($name:ident, $f:literal) => {
            fn $name() -> &'static $crate::test_utils::TestLoader {
                static TEST: once_cell::sync::Lazy<$crate::test_utils::TestLoader> = once_cell::sync::Lazy::new(|| {
                    $crate::test_utils::TestLoader::new($f).unwrap()
                });

                &TEST
            }
        };
    }
    pub(crate) use load_tests;
}

pub enum TestErr {
    MissingTestHeader,
    DuplicateTest(String),
    IoErr(std::io::Error),
    TestFailed(String /* name of test */, String /* the error */),
    UnknownTest(String)
}
impl From<std::io::Error> for TestErr {
    fn from(value: std::io::Error) -> Self {
        TestErr::IoErr(value)
    }
}

impl Debug for TestErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTestHeader => write!(f, "missing test header"),
            Self::DuplicateTest(name) => write!(f, "duplicate test {name}"),
            Self::IoErr(err) => write!(f, "{err:?}"),
            Self::TestFailed(test, err) => write!(f, "{test} failed:\n{err}"),
            Self::UnknownTest(name) => write!(f, "unknown test {name}"),
        }
    }
}

pub type TestResult<T> = Result<T, TestErr>;

/// A single program loaded from a test file.
#[derive(Clone, Copy)]
pub struct Test<'t> {
    name: &'t str,
    code: &'t str
}

impl Test<'_> {
    fn fail<E: DwErr>(&self, errs: &[FullDwErr<E>]) -> TestErr {
        let msgs: Vec<_> = errs.iter().map(|e| e.full_msg(self.code)).collect();
        TestErr::TestFailed(self.name.to_string(), msgs.join("\n\n"))
    }

    pub fn parse(&self) -> TestResult<parser::cst::Program> {
        let (tokens, lex_errs) = lexer::tokenize(self.code, self.name);
        if !lex_errs.is_empty() {
            return Err(self.fail(&lex_errs));
        }

        match parser::parse(tokens) {
            (program, errs) if errs.is_empty() => Ok(program),
            (_, errs) => Err(self.fail(&errs)),
        }
    }

    pub fn lower(&self) -> TestResult<ast::Program> {
        self.parse()?
            .lower(&LowerCtx::new(self.name))
            .map_err(|e| self.fail(&[e]))
    }

    pub fn transpile(&self) -> TestResult<estree::Program> {
        self.lower().map(|p| p.transpile())
    }
}

/// A set of named test programs, loaded from one file.
///
/// Each program starts with a `// ! TEST <name>` line.
pub struct TestLoader(HashMap<String, String>);
impl TestLoader {
    pub fn new(fp: impl AsRef<Path>) -> TestResult<Self> {
        let code = fs::read_to_string(fp.as_ref())?;

        let mut map = HashMap::new();
        for (header, code) in split_tests(&code)? {
            match map.entry(header) {
                Entry::Occupied(e) => Err(TestErr::DuplicateTest(e.remove_entry().0))?,
                Entry::Vacant(e) => e.insert(code),
            };
        }

        Ok(Self(map))
    }

    pub fn get(&self, id: &str) -> TestResult<Test<'_>> {
        match self.0.get_key_value(id) {
            Some((name, code)) => Ok(Test { name, code }),
            None => Err(TestErr::UnknownTest(id.to_string())),
        }
    }

    pub fn all(&self) -> impl Iterator<Item=Test<'_>> + '_ {
        self.0.iter().map(|(name, code)| Test { name, code })
    }
}

fn test_name(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix("// ! TEST ")
        .map(|c| c.trim())
}

fn split_tests(code: &str) -> TestResult<Vec<(String, String)>> {
    let mut lines = code.lines();
    let mut tests = vec![];

    let mut header = match lines.next() {
        Some(line) => test_name(line)
            .ok_or(TestErr::MissingTestHeader)?
            .to_string(),
        None => return Ok(tests),
    };
    let mut current_test = String::new();

    for line in lines {
        match test_name(line) {
            Some(next_header) => {
                tests.push((header, current_test));

                header = next_header.to_string();
                current_test = String::new();
            },
            None => {
                current_test.push_str(line);
                current_test.push('\n');
            },
        }
    }
    tests.push((header, current_test));

    Ok(tests)
}

/// Lex, parse, and lower a string, panicking with the diagnostic on any error.
pub fn lower_str(input: &str) -> ast::Program {
    Test { name: "<input>", code: input }
        .lower()
        .unwrap_or_else(|e| panic!("{e:?}"))
}

/// Assert that the span of every node in the program contains the spans of its children.
pub fn assert_spans_contained(program: &ast::Program) {
    fn check_expr(parent: &ast::Expr) {
        for child in parent.children() {
            assert!(parent.span().contains(child.span()), "{parent} does not contain {child}");
            check_expr(child);
        }

        if let ast::Expr::Member(m) | ast::Expr::NamespaceMember(m) = parent {
            assert!(m.span.contains(&m.property.span), "{parent} does not contain {}", m.property);
        }
    }

    for stmt in &program.stmts {
        assert!(program.span.contains(stmt.span()), "program does not contain {stmt}");

        match stmt {
            ast::Stmt::Decl(d) => {
                assert!(d.span.contains(&d.ident.span), "{stmt} does not contain {}", d.ident);
                assert!(d.span.contains(d.value.span()), "{stmt} does not contain {}", d.value);
                check_expr(&d.value);
            },
            ast::Stmt::Expr(e) => check_expr(&e.expr),
        }
    }
}
