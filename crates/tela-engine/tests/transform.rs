// SPDX-License-Identifier: Apache-2.0 OR MIT
//! End-to-end transformation cases: template text in, generated Lua out.

use tela_engine::compile;

#[test]
fn empty_template_compiles_to_nothing() {
    assert_eq!(compile(""), "");
}

#[test]
fn tagless_template_is_one_verbatim_block() {
    assert_eq!(
        compile("no tags at all"),
        "_o([=[\nno tags at all]=])"
    );
}

#[test]
fn stray_closers_are_preserved_in_text() {
    assert_eq!(
        compile("some }} in a text"),
        "_o([=[\nsome }} in a text]=])"
    );
    assert_eq!(
        compile("some %} in a text"),
        "_o([=[\nsome %} in a text]=])"
    );
}

#[test]
fn expressions_work_at_every_position() {
    assert_eq!(
        compile("some {{3+4}} expression"),
        "_o([=[\nsome ]=])_o(3+4)_o([=[\n expression]=])"
    );
    assert_eq!(
        compile("{{expression}} at start"),
        "_o(expression)_o([=[\n at start]=])"
    );
    assert_eq!(
        compile("expression {{at end}}"),
        "_o([=[\nexpression ]=])_o(at end)"
    );
}

#[test]
fn quoted_closers_do_not_end_an_expression() {
    assert_eq!(
        compile(r#"{{with "string \" }}" expression}}"#),
        r#"_o(with "string \" }}" expression)"#
    );
    assert_eq!(
        compile(r#"{{with 'string \' }}' expression}}"#),
        r#"_o(with 'string \' }}' expression)"#
    );
    assert_eq!(
        compile(r#"{{with "a }} b" tail}}"#),
        r#"_o(with "a }} b" tail)"#
    );
}

#[test]
fn statements_work_at_every_position() {
    assert_eq!(
        compile("some {%3+4%} statement"),
        "_o([=[\nsome ]=]) 3+4 _o([=[\n statement]=])"
    );
    assert_eq!(
        compile("{%statement%} at start"),
        " statement _o([=[\n at start]=])"
    );
    assert_eq!(
        compile("statement {%at end%}"),
        "_o([=[\nstatement ]=]) at end "
    );
}

#[test]
fn quoted_closers_do_not_end_a_statement() {
    assert_eq!(
        compile(r#"{%with "string \" %}" statement%}"#),
        r#" with "string \" %}" statement "#
    );
    assert_eq!(
        compile(r#"{%with 'string \' %}' statement%}"#),
        r#" with 'string \' %}' statement "#
    );
}

#[test]
fn whitespace_control_trims_the_blank_line() {
    let source = "\n  first line\n  {%  x=1  %}\n  second line\n  {%- x=2 -%}\n  third line";
    assert_eq!(
        compile(source),
        "_o([=[\n\n  first line\n  ]=])   x=1   _o([=[\n\n  second line]=])  x=2  _o([=[\n  third line]=])"
    );
}

#[test]
fn empty_trimmed_statement_collapses_to_two_spaces() {
    assert_eq!(compile("{%--%}"), "  ");
}

#[test]
fn unfinished_expression_closes_gracefully() {
    assert_eq!(
        compile("unfinished {{expression"),
        "_o([=[\nunfinished ]=])_o(expression)"
    );
    assert_eq!(
        compile(r#"unfinished {{expression with "string"#),
        "_o([=[\nunfinished ]=])_o(expression with \"string)"
    );
    assert_eq!(
        compile(r#"unfinished {{expression with "string\""#),
        "_o([=[\nunfinished ]=])_o(expression with \"string\\\")"
    );
}

#[test]
fn unfinished_statement_closes_gracefully() {
    assert_eq!(
        compile("unfinished {%statement"),
        "_o([=[\nunfinished ]=]) statement "
    );
    assert_eq!(
        compile(r#"unfinished {%statement with "string"#),
        "_o([=[\nunfinished ]=]) statement with \"string "
    );
}

#[test]
fn escaped_opener_passes_through_backslash_and_all() {
    assert_eq!(compile(r"keep \{{ these braces"), "_o([=[\nkeep \\{{ these braces]=])");
    // The escape only shields the scanner; a real tag after it still opens.
    assert_eq!(
        compile(r"\{{ but {{x}}"),
        "_o([=[\n\\{{ but ]=])_o(x)"
    );
}

#[test]
fn double_brackets_in_text_survive_the_level_one_quoting() {
    assert_eq!(
        compile("this is [[text]] in double brackets"),
        "_o([=[\nthis is [[text]] in double brackets]=])"
    );
}

#[test]
fn concatenated_fragments_match_compile() {
    let source = "a {{b}} c {% d %} e \\{{ f";
    let mut pulled = String::new();
    let mut scanner = tela_engine::Scanner::new(source);
    while let Some(fragment) = scanner.next_fragment() {
        pulled.push_str(fragment.as_str());
    }
    assert_eq!(pulled, compile(source));
}
