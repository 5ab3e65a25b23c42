// Integration tests for the loopc front end

use loopc::{
    parse, parse_with_options, to_sexpr, AssignOp, DiagnosticKind, Equation, Lexer, ParseOptions,
    Printer, Statement, TokenKind,
};
use tracing_subscriber::EnvFilter;

/// Route parser logging to the test output; `RUST_LOG=loopc=trace` shows it.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sexpr(source: &str) -> String {
    let output = parse(source);
    assert!(
        output.diagnostics.is_empty(),
        "Parsing failed: {:?}",
        output.diagnostics
    );
    to_sexpr(&output.program)
}

#[test]
fn test_clean_program_has_one_statement_per_statement_written() {
    init_tracing();
    let source = r#"
        int a;
        int b, c = 4;
        a = b + c;
        b -= 2;
        c ^= a % 3;
    "#;

    let output = parse(source);

    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(output.program.statements.len(), 5);
}

#[test]
fn test_full_program() {
    init_tracing();
    let source = r#"
        int i = 0;
        int total, step = 2;
        loopc i < 10 and total != 100 : begin
            total += i * step;
            i += 1;
        end
        if total > 50 : begin
            step = 1;
        end
        elif total > 20 or i == 0 : begin
            step = 3;
        end
        else : begin
            step = (step + 1) ^ 2;
        end
    "#;

    let output = parse(source);
    assert!(!output.has_errors(), "{:?}", output.diagnostics);

    let kinds: Vec<_> = output
        .program
        .statements
        .iter()
        .map(|s| match s {
            Statement::Declaration(_) => "declaration",
            Statement::Equation(_) => "equation",
            Statement::If(_) => "if",
            Statement::Loop(_) => "loop",
        })
        .collect();
    assert_eq!(kinds, vec!["declaration", "declaration", "loop", "if"]);

    // Locations point at the first token of each statement
    let lines: Vec<_> = output
        .program
        .statements
        .iter()
        .map(|s| s.location().line)
        .collect();
    assert_eq!(lines, vec![2, 3, 4, 8]);
}

#[test]
fn test_printed_program_reparses_identically() {
    init_tracing();
    let sources = [
        "int x = 2 + 3 * 4;",
        "int a, b, c; a = (a - b) - (c - a); b = a ^ b ^ c; c = a ^ (b ^ c);",
        "loopc (i + 1) * 2 <= n and i >= 0 or n == 0 : begin i += 1; n %= (i + 2) / 3; end",
        "if a == 1 : begin end elif a == 2 : begin b = 1; end elif a == 3 : begin end else : begin b = 0; end",
    ];

    for source in sources {
        let first = parse(source);
        assert!(first.diagnostics.is_empty(), "{source}: {:?}", first.diagnostics);

        let printed = Printer::print(&first.program);
        let second = parse(&printed);
        assert!(
            second.diagnostics.is_empty(),
            "printed text failed to parse:\n{printed}\n{:?}",
            second.diagnostics
        );
        assert_eq!(to_sexpr(&first.program), to_sexpr(&second.program), "{printed}");

        // Printing is a fixed point
        assert_eq!(Printer::print(&second.program), printed);
    }
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    assert_eq!(sexpr("int x = 2 + 3 * 4;"), "(program (int (x) (+ 2 (* 3 4))))");
}

#[test]
fn test_power_binds_tighter_than_multiplication() {
    assert_eq!(sexpr("int x = 2 * 3 ^ 2;"), "(program (int (x) (* 2 (^ 3 2))))");
}

#[test]
fn test_compound_assignment_is_tagged() {
    let output = parse("x += 1;");
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.program.statements.len(), 1);
    assert!(matches!(
        &output.program.statements[0],
        Statement::Equation(Equation {
            op: AssignOp::PlusAssign,
            ..
        })
    ));
}

#[test]
fn test_unknown_character_reports_one_lex_error() {
    init_tracing();
    let source = "int x = 2 @ 3;";
    let output = parse(source);

    assert!(output.program.statements.is_empty());
    assert_eq!(output.diagnostics.len(), 1);

    let diagnostic = &output.diagnostics[0];
    assert_eq!(diagnostic.kind(), DiagnosticKind::LexError);
    assert_eq!(diagnostic.location().column, 11);
    assert_eq!(&source[diagnostic.span().start..diagnostic.span().end], "@");
    assert!(diagnostic.to_string().contains('@'));
}

#[test]
fn test_missing_end_is_unterminated_block() {
    let output = parse("if x > 1 : begin x = 1 ;");
    assert!(output.program.statements.is_empty());
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind(), DiagnosticKind::UnterminatedBlock);
    assert_eq!(
        output.diagnostics[0].to_string(),
        "1:25: unterminated 'if' block opened at 1:1: expected 'end' before end of input"
    );
}

#[test]
fn test_boolean_chain_associates_to_the_left() {
    assert_eq!(
        sexpr("if x > 1 and y > 2 or z > 3 : begin end"),
        "(program (if (or (and (> x 1) (> y 2)) (> z 3))))"
    );
}

#[test]
fn test_parsing_terminates_on_garbage() {
    init_tracing();
    let inputs = [
        ")))",
        "end end end",
        "if if if",
        "begin",
        "@@@ ###",
        "int int int",
        ":",
        "loopc",
        "elif x",
        "else",
        "x = = = ;",
        "if x > 1 : begin x = 1; elif",
        "((((((((",
        "int a = (1 + ; loopc : ; if : begin",
        "; ; ; , , ,",
        "é ü ß",
    ];

    for source in inputs {
        let output = parse(source);
        assert!(output.has_errors(), "no diagnostics for {source:?}");
        assert!(output.program.statements.is_empty(), "{source:?}");
    }

    // A valid block followed by stray tokens keeps the block
    let output = parse("if x > 1 : begin end end end elif");
    assert_eq!(output.program.statements.len(), 1);
    assert_eq!(output.diagnostics.len(), 3);
}

#[test]
fn test_every_lexeme_matches_its_span() {
    let source = "int total = 0;\nloopc total <= 99 : begin\n\ttotal ^= 2 @ 1;\nend";
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize();

    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
    for token in &tokens {
        let text = token.text(source);
        match token.kind {
            TokenKind::Eof => assert_eq!(token.span.start, source.len()),
            TokenKind::Ident => assert!(text.chars().all(|c| c.is_ascii_alphabetic())),
            TokenKind::Number => assert!(text.chars().all(|c| c.is_ascii_digit())),
            TokenKind::Unknown => assert_eq!(text.chars().count(), 1),
            kind => assert_eq!(format!("'{text}'"), kind.to_string()),
        }
    }

    // End of input stays end of input
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
}

#[test]
fn test_nesting_limit_is_configurable() {
    let source = "x = ((((1))));";

    let output = parse(source);
    assert!(output.diagnostics.is_empty());

    let options = ParseOptions::default().with_max_nesting_depth(3);
    let output = parse_with_options(source, options);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind(), DiagnosticKind::NestingTooDeep);
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let source = format!("x = {}1{};", "(".repeat(10_000), ")".repeat(10_000));
    let output = parse(&source);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind(), DiagnosticKind::NestingTooDeep);
}

#[test]
fn test_into_result_bundles_source() {
    use miette::Diagnostic as _;

    let source = "int a, a; x = ;";
    let errors = parse(source).into_result(source).unwrap_err();

    assert_eq!(errors.diagnostics.len(), 2);
    assert_eq!(errors.to_string(), "parsing failed with 2 error(s)");
    assert_eq!(
        errors.code().map(|c| c.to_string()).as_deref(),
        Some("loopc::parse_failed")
    );
    assert!(errors.source_code().is_some());
}
