//! Hand-assembled bytecode exercising the end-to-end scenarios in
//! `SPEC_FULL.md` §8, built directly with [`CodeBuilder`] rather than lowered
//! from source (the AST→bytecode compiler is an external collaborator).

use std::cell::RefCell;
use std::rc::Rc;

use gsc::bytecode::{BinaryOp, CodeBuilder, FunctionTable};
use gsc::object::Object;
use gsc::value::Variant;
use gsc::vm::VM;

fn single_function_table(function: gsc::bytecode::CompiledFunction, file: &str, name: &str) -> FunctionTable {
    let mut table = FunctionTable::new();
    table.insert(file, name, function);
    table
}

#[test]
fn scenario_1_precedence_evaluates_to_seven() {
    // main() { a = 1 + 2 * 3; return a; }
    let mut builder = CodeBuilder::new("test.gsc", "main");
    builder.emit_push_integer(3); // right of inner mul
    builder.emit_push_integer(2); // left of inner mul
    builder.emit_binop(BinaryOp::Mul);
    builder.emit_push_integer(1); // left of outer add
    builder.emit_binop(BinaryOp::Add);
    builder.emit_ret(true);
    let table = single_function_table(builder.build(), "test.gsc", "main");

    let mut vm = VM::new(table);
    let thread = vm.spawn_thread("test.gsc", "main", vec![]).unwrap();
    let result = vm.run_to_completion(thread).unwrap();
    assert_eq!(result, Some(Variant::Integer(7)));
}

#[test]
fn scenario_2_vector_property_law() {
    // main() { v = (1, 2, 3); return v.y + v[2]; }
    let mut builder = CodeBuilder::new("test.gsc", "main");
    builder.emit_push_integer(1); // x
    builder.emit_push_integer(2); // y
    builder.emit_push_integer(3); // z (popped first by PushVector)
    builder.emit_push_vector();
    builder.emit_load_ref("v");
    builder.emit_store_ref();

    // right operand: v[2]
    builder.emit_load_value("v");
    builder.emit_push_string("2");
    builder.emit_load_field_value();
    // left operand: v.y
    builder.emit_load_value("v");
    builder.emit_push_string("y");
    builder.emit_load_field_value();
    builder.emit_binop(BinaryOp::Add);
    builder.emit_ret(true);
    let table = single_function_table(builder.build(), "test.gsc", "main");

    let mut vm = VM::new(table);
    let thread = vm.spawn_thread("test.gsc", "main", vec![]).unwrap();
    let result = vm.run_to_completion(thread).unwrap();
    assert_eq!(result, Some(Variant::Number(5.0)));
}

#[test]
fn scenario_3_switch_fallthrough_concatenates_strings() {
    // switch(2) { case 1: case 2: a = "x"; case 3: a = a + "y"; break; case 4: a = "z"; } return a;
    let mut builder = CodeBuilder::new("test.gsc", "main");
    let case12 = builder.new_label();
    let case3 = builder.new_label();
    let case4 = builder.new_label();
    let end = builder.new_label();

    builder.emit_push_integer(2);
    builder.emit_load_ref("d");
    builder.emit_store_ref();

    for (value, target) in [(1, case12), (2, case12), (3, case3), (4, case4)] {
        builder.emit_push_integer(value);
        builder.emit_load_value("d");
        builder.emit_binop(BinaryOp::Eq);
        builder.emit_test();
        builder.emit_jump_not_zero(target);
    }
    builder.emit_jump(end);

    builder.mark_label(case12);
    builder.emit_push_string("x");
    builder.emit_load_ref("a");
    builder.emit_store_ref();
    // falls through into case3, no jump emitted

    builder.mark_label(case3);
    builder.emit_push_string("y");
    builder.emit_load_value("a");
    builder.emit_binop(BinaryOp::Add);
    builder.emit_load_ref("a");
    builder.emit_store_ref();
    builder.emit_jump(end); // break

    builder.mark_label(case4);
    builder.emit_push_string("z");
    builder.emit_load_ref("a");
    builder.emit_store_ref();
    // falls through to end

    builder.mark_label(end);
    builder.emit_load_value("a");
    builder.emit_ret(true);
    let table = single_function_table(builder.build(), "test.gsc", "main");

    let mut vm = VM::new(table);
    let thread = vm.spawn_thread("test.gsc", "main", vec![]).unwrap();
    let result = vm.run_to_completion(thread).unwrap();
    assert_eq!(result, Some(Variant::String(Rc::from("xy"))));
}

#[test]
fn scenario_4_threaded_call_runs_before_main_finishes() {
    // main(state) { self thread worker(state); wait 0.0; return 1; }
    // worker(state) { state.ran = 1; }
    let mut main_builder = CodeBuilder::new("test.gsc", "main").with_params(&["state"]);
    main_builder.emit_push_array(); // stand-in receiver object
    main_builder.emit_load_value("state");
    main_builder.emit_call("worker", 1, true, true);
    main_builder.emit_pop(); // discard the thread handle
    main_builder.emit_push_number(0.0);
    main_builder.emit_wait();
    main_builder.emit_push_integer(1);
    main_builder.emit_ret(true);

    let mut worker_builder = CodeBuilder::new("test.gsc", "worker").with_params(&["state"]);
    worker_builder.emit_push_integer(1);
    worker_builder.emit_load_ref("state");
    worker_builder.emit_push_string("ran");
    worker_builder.emit_load_field_ref();
    worker_builder.emit_store_ref();
    worker_builder.emit_ret(false);

    let mut table = FunctionTable::new();
    table.insert("test.gsc", "main", main_builder.build());
    table.insert("test.gsc", "worker", worker_builder.build());

    let state = Rc::new(RefCell::new(Object::new()));
    let mut vm = VM::new(table);
    let thread = vm.spawn_thread("test.gsc", "main", vec![Variant::Object(state.clone())]).unwrap();
    let result = vm.run_to_completion(thread).unwrap();
    assert_eq!(result, Some(Variant::Integer(1)));
    assert_eq!(state.borrow().get_field("ran"), Variant::Integer(1));
}

#[test]
fn scenario_5_undefined_autoboxes_into_an_object() {
    // a() { b = undefined; b.name = "hi"; return b.name; }
    let mut builder = CodeBuilder::new("test.gsc", "a");
    builder.emit_push_undefined();
    builder.emit_load_ref("b");
    builder.emit_store_ref();

    builder.emit_push_string("hi");
    builder.emit_load_ref("b");
    builder.emit_push_string("name");
    builder.emit_load_field_ref();
    builder.emit_store_ref();

    builder.emit_load_value("b");
    builder.emit_push_string("name");
    builder.emit_load_field_value();
    builder.emit_ret(true);
    let table = single_function_table(builder.build(), "test.gsc", "a");

    let mut vm = VM::new(table);
    let thread = vm.spawn_thread("test.gsc", "a", vec![]).unwrap();
    let result = vm.run_to_completion(thread).unwrap();
    assert_eq!(result, Some(Variant::String(Rc::from("hi"))));
}

#[test]
fn scenario_6_function_pointer_call_writes_through_level() {
    // main(level) { f = ::worker; thread [[f]](level, 5); wait 0; return 1; }
    // worker(level, x) { level.out = x; }
    let mut main_builder = CodeBuilder::new("test.gsc", "main").with_params(&["level"]);
    main_builder.emit_push_function_pointer(Some("test.gsc"), "worker");
    main_builder.emit_load_ref("f");
    main_builder.emit_store_ref();

    main_builder.emit_load_value("f");
    main_builder.emit_load_value("level");
    main_builder.emit_push_integer(5);
    main_builder.emit_call_function_pointer(2, false, true);
    main_builder.emit_pop();
    main_builder.emit_push_number(0.0);
    main_builder.emit_wait();
    main_builder.emit_push_integer(1);
    main_builder.emit_ret(true);

    let mut worker_builder = CodeBuilder::new("test.gsc", "worker").with_params(&["level", "x"]);
    worker_builder.emit_load_value("x");
    worker_builder.emit_load_ref("level");
    worker_builder.emit_push_string("out");
    worker_builder.emit_load_field_ref();
    worker_builder.emit_store_ref();
    worker_builder.emit_ret(false);

    let mut table = FunctionTable::new();
    table.insert("test.gsc", "main", main_builder.build());
    table.insert("test.gsc", "worker", worker_builder.build());

    let mut vm = VM::new(table);
    let level = vm.level();
    let thread = vm.spawn_thread("test.gsc", "main", vec![Variant::Object(level.clone())]).unwrap();
    let result = vm.run_to_completion(thread).unwrap();
    assert_eq!(result, Some(Variant::Integer(1)));
    assert_eq!(level.borrow().get_field("out"), Variant::Integer(5));
}

#[test]
fn endon_cancellation_matches_notify_case_insensitively() {
    // waiter(receiver) { receiver endon("Death"); wait 100.0; return 1; }
    // notifier(receiver) { receiver notify("death"); return 0; }
    let mut waiter_builder = CodeBuilder::new("test.gsc", "waiter").with_params(&["receiver"]);
    waiter_builder.emit_load_value("receiver");
    waiter_builder.emit_push_string("Death");
    waiter_builder.emit_call("endon", 1, true, false);
    waiter_builder.emit_pop();
    waiter_builder.emit_push_number(100.0);
    waiter_builder.emit_wait();
    waiter_builder.emit_push_integer(1);
    waiter_builder.emit_ret(true);

    let mut notifier_builder = CodeBuilder::new("test.gsc", "notifier").with_params(&["receiver"]);
    notifier_builder.emit_load_value("receiver");
    notifier_builder.emit_push_string("death");
    notifier_builder.emit_call("notify", 1, true, false);
    notifier_builder.emit_pop();
    notifier_builder.emit_push_integer(0);
    notifier_builder.emit_ret(true);

    let mut table = FunctionTable::new();
    table.insert("test.gsc", "waiter", waiter_builder.build());
    table.insert("test.gsc", "notifier", notifier_builder.build());

    let receiver = Rc::new(RefCell::new(Object::new()));
    let mut vm = VM::new(table);
    let waiter = vm.spawn_thread("test.gsc", "waiter", vec![Variant::Object(receiver.clone())]).unwrap();
    let notifier = vm.spawn_thread("test.gsc", "notifier", vec![Variant::Object(receiver)]).unwrap();

    // Differently-cased event names ("Death" vs "death") must still be the
    // same event for cancellation purposes, matching the field/variable
    // case-folding used everywhere else in this dialect.
    let notifier_result = vm.run_to_completion(notifier).unwrap();
    assert_eq!(notifier_result, Some(Variant::Integer(0)));

    let waiter_result = vm.run_to_completion(waiter).unwrap();
    assert_eq!(waiter_result, None);
}

#[test]
fn notify_wakes_a_waiting_thread_with_payload() {
    // waiter(receiver) { receiver waittill("go", amount); return amount; }
    // notifier(receiver) { receiver notify("go", 7); return 0; }
    let mut waiter_builder = CodeBuilder::new("test.gsc", "waiter").with_params(&["receiver"]);
    waiter_builder.emit_push_string("amount"); // captured param name (bottom)
    waiter_builder.emit_push_string("go"); // event name
    waiter_builder.emit_load_value("receiver"); // object, popped first
    waiter_builder.emit_wait_till(1, true);
    waiter_builder.emit_load_value("amount");
    waiter_builder.emit_ret(true);

    let mut notifier_builder = CodeBuilder::new("test.gsc", "notifier").with_params(&["receiver"]);
    notifier_builder.emit_load_value("receiver"); // object, bottom
    notifier_builder.emit_push_string("go"); // event
    notifier_builder.emit_push_integer(7); // payload
    notifier_builder.emit_call("notify", 2, true, false);
    notifier_builder.emit_pop();
    notifier_builder.emit_push_integer(0);
    notifier_builder.emit_ret(true);

    let mut table = FunctionTable::new();
    table.insert("test.gsc", "waiter", waiter_builder.build());
    table.insert("test.gsc", "notifier", notifier_builder.build());

    let receiver = Rc::new(RefCell::new(Object::new()));
    let mut vm = VM::new(table);
    let waiter = vm.spawn_thread("test.gsc", "waiter", vec![Variant::Object(receiver.clone())]).unwrap();
    let _notifier = vm.spawn_thread("test.gsc", "notifier", vec![Variant::Object(receiver)]).unwrap();

    let waiter_result = vm.run_to_completion(waiter).unwrap();
    assert_eq!(waiter_result, Some(Variant::Integer(7)));
}
