//! Parser/AST invariants from `SPEC_FULL.md` §8, exercised over literal
//! source text through the test-only tokenizer in `support`.

mod support;

use gsc::ast::{BinOp, CaseLabel, Expression, Statement};
use gsc::{Parser, Program};
use std::rc::Rc;

fn parse(src: &str) -> Program {
    let tokens = support::lex(src, "test.gsc");
    Parser::new(tokens, false).parse_program().expect("source should parse")
}

fn main_body(program: &Program) -> &[Statement] {
    &program.functions.iter().find(|f| f.name == "main").expect("main() present").body
}

#[test]
fn precedence_orders_multiplication_before_addition() {
    let program = parse("main() { a = 1 + 2 * 3; return a; }");
    let Statement::Expression(Expression::Assignment(assignment)) = &main_body(&program)[0] else {
        panic!("expected assignment statement");
    };
    let Expression::Binary(add) = &assignment.rhs else { panic!("expected binary add") };
    assert_eq!(add.op, BinOp::Add);
    let Expression::Binary(mul) = &add.right else { panic!("expected nested multiply") };
    assert_eq!(mul.op, BinOp::Mul);
}

#[test]
fn switch_with_fallthrough_shares_case_bodies() {
    let program = parse(
        r#"main() {
            switch(2) {
                case 1:
                case 2:
                    a = "x";
                case 3:
                    a = a + "y";
                    break;
                case 4:
                    a = "z";
            }
            return a;
        }"#,
    );
    let Statement::Switch { cases, .. } = &main_body(&program)[0] else { panic!("expected switch") };
    assert_eq!(cases.len(), 4);
    // case 1, case 2, case 3 all fall into the same run (no break between
    // their headers), so they share one body right up to the break.
    assert!(Rc::ptr_eq(&cases[0].body, &cases[1].body));
    assert!(Rc::ptr_eq(&cases[1].body, &cases[2].body));
    assert_eq!(cases[0].body.borrow().len(), 2);
    // case 4 starts a fresh run after the break.
    assert!(!Rc::ptr_eq(&cases[2].body, &cases[3].body));
    assert_eq!(cases[3].body.borrow().len(), 1);
    assert_eq!(cases[2].test, Some(CaseLabel::Integer(3)));
}

#[test]
fn assignment_is_right_associative() {
    let program = parse("main() { a = b = 1; return a; }");
    let Statement::Expression(Expression::Assignment(outer)) = &main_body(&program)[0] else {
        panic!("expected assignment");
    };
    assert!(matches!(outer.rhs, Expression::Assignment(_)));
}

#[test]
fn method_call_juxtaposition_builds_receiver() {
    let program = parse("main() { self thread worker(1, 2); return 1; }");
    let Statement::Expression(Expression::Call(call)) = &main_body(&program)[0] else {
        panic!("expected call statement");
    };
    assert!(call.threaded);
    assert!(call.object.is_some());
    assert_eq!(call.arguments.len(), 2);
}

#[test]
fn vector_literal_versus_parenthesized_expression() {
    let program = parse("main() { v = (1, 2, 3); n = (1 + 2); return v; }");
    let Statement::Expression(Expression::Assignment(first)) = &main_body(&program)[0] else {
        panic!("expected assignment");
    };
    assert!(matches!(first.rhs, Expression::Vector(_)));
    let Statement::Expression(Expression::Assignment(second)) = &main_body(&program)[1] else {
        panic!("expected assignment");
    };
    assert!(matches!(second.rhs, Expression::Binary(_)));
}

#[test]
fn function_pointer_call_form_is_recognized() {
    let program = parse("main() { f = ::worker; thread [[f]](5); return 1; }");
    let Statement::Expression(Expression::Call(call)) = &main_body(&program)[1] else {
        panic!("expected call statement");
    };
    assert!(call.threaded);
    assert!(matches!(call.callee, gsc::ast::Callee::FunctionPointer(_)));
}

#[test]
fn qualified_direct_call_carries_its_file_reference() {
    let program = parse("main() { util::doSomething(1); return 1; }");
    let Statement::Expression(Expression::Call(call)) = &main_body(&program)[0] else {
        panic!("expected call statement");
    };
    let gsc::ast::Callee::Name { file_reference, name } = &call.callee else { panic!("expected named callee") };
    assert_eq!(file_reference.as_deref(), Some("util"));
    assert_eq!(name, "doSomething");
    assert_eq!(call.arguments.len(), 1);
}

#[test]
fn bare_function_pointer_call_needs_no_receiver_or_thread() {
    let program = parse("main() { f = ::worker; x = [[f]](5); return x; }");
    let Statement::Expression(Expression::Assignment(assignment)) = &main_body(&program)[1] else {
        panic!("expected assignment statement");
    };
    let Expression::Call(call) = &assignment.rhs else { panic!("expected call expression") };
    assert!(!call.threaded);
    assert!(call.object.is_none());
    assert!(matches!(call.callee, gsc::ast::Callee::FunctionPointer(_)));
    assert_eq!(call.arguments.len(), 1);
}

#[test]
fn developer_block_is_dropped_outside_developer_mode() {
    let tokens = support::lex("main() { /# a = 1; #/ return 2; }", "test.gsc");
    let program = Parser::new(tokens, false).parse_program().unwrap();
    let body = main_body(&program);
    assert_eq!(body.len(), 2);
    assert_eq!(body[0], Statement::Empty);
}

#[test]
fn developer_block_is_kept_in_developer_mode() {
    let tokens = support::lex("main() { /# a = 1; #/ return 2; }", "test.gsc");
    let program = Parser::new(tokens, true).parse_program().unwrap();
    let body = main_body(&program);
    assert!(matches!(body[0], Statement::DeveloperBlock(_)));
}

#[test]
fn do_while_is_a_parse_error() {
    let tokens = support::lex("main() { do { a = 1; } while(a); }", "test.gsc");
    let err = Parser::new(tokens, false).parse_program().unwrap_err();
    assert!(matches!(err, gsc::ParseError::UnhandledStatement { statement: "do while", .. }));
}
