//! Integration tests for call lowering using Unit as the entry point.
//!
//! Function bodies are built with `AstBuilder`, lowered through the full
//! pass, and checked both structurally and by tracing the HIR.

use bumpalo::Bump;
use kestrel::ast::AstBuilder;
use kestrel::compiler::hir::trace::{Trace, Value};
use kestrel::compiler::{ASYNC_GENERATOR_FACTORY, GENERATOR_FACTORY, STORE_LOCAL};
use kestrel::registry::{ClassEntry, ClosureDescriptor};
use kestrel::{BuildError, FunctionFlags, HirModule, LoweringConfig, ResultTag, Unit};
use kestrel_core::BuiltinModule;

fn unit<'ast>(name: &str) -> Unit<'ast> {
    Unit::with_standard_library(name).expect("standard library registers")
}

fn build(unit: &Unit<'_>) -> HirModule {
    match unit.build() {
        Ok(module) => module,
        Err(err) => panic!("build failed: {} {:?}", err, err.diagnostics()),
    }
}

// =============================================================================
// Inheritance
// =============================================================================

#[test]
fn test_inherited_method_dispatches_to_declaring_class() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let speak = ast.method("Animal", "speak", &[], &[ast.ret(Some(ast.this()))], FunctionFlags::METHOD);
    let main = ast.function(
        "main",
        &[],
        &[
            ast.let_("dog", ast.new_(ast.name("Dog"), &[])),
            ast.ret(Some(ast.method_call(ast.name("dog"), "speak", &[]))),
        ],
        FunctionFlags::empty(),
    );

    let mut unit = unit("scenario_a");
    unit.add_class(ClassEntry::new("Animal").with_method("speak")).unwrap();
    unit.add_class(ClassEntry::new("Dog").extends("Animal")).unwrap();
    unit.add_function(speak).unwrap();
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let calls: Vec<&[_]> = module.function("main").unwrap().calls_to("Animal_speak").collect();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 1);

    let mut trace = Trace::new(&module);
    let result = trace.run("main", vec![]).unwrap();
    assert_eq!(trace.entered(), ["main", "Animal_speak"]);
    // The receiver passed as argument 0 is the instance `new Dog()` created.
    let created = trace.calls_to("kestrel_object_create").next().unwrap();
    assert_eq!(result, created.result);
}

#[test]
fn test_super_method_dispatches_from_parent() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let speak = ast.method("Animal", "speak", &[], &[ast.ret(Some(ast.this()))], FunctionFlags::METHOD);
    let bark = ast.method(
        "Dog",
        "bark",
        &[],
        &[ast.ret(Some(ast.method_call(ast.super_(), "speak", &[])))],
        FunctionFlags::METHOD,
    );
    let main = ast.function(
        "main",
        &[],
        &[
            ast.let_("dog", ast.new_(ast.name("Dog"), &[])),
            ast.ret(Some(ast.method_call(ast.name("dog"), "bark", &[]))),
        ],
        FunctionFlags::empty(),
    );

    let mut unit = unit("scenario_b");
    unit.add_class(ClassEntry::new("Animal").with_method("speak")).unwrap();
    unit.add_class(ClassEntry::new("Dog").extends("Animal").with_method("bark"))
        .unwrap();
    for decl in [speak, bark, main] {
        unit.add_function(decl).unwrap();
    }
    let module = build(&unit);

    let bark = module.function("Dog_bark").unwrap();
    assert_eq!(bark.calls_to("Animal_speak").count(), 1);
    assert_eq!(bark.calls_to("Dog_speak").count(), 0);

    let mut trace = Trace::new(&module);
    let result = trace.run("main", vec![]).unwrap();
    assert_eq!(trace.entered(), ["main", "Dog_bark", "Animal_speak"]);
    let created = trace.calls_to("kestrel_object_create").next().unwrap();
    assert_eq!(result, created.result);
}

#[test]
fn test_super_constructor_rebinds_this() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let animal_ctor = ast.method(
        "Animal",
        "constructor",
        &[ast.param("name")],
        &[],
        FunctionFlags::METHOD | FunctionFlags::CONSTRUCTOR,
    );
    let dog_ctor = ast.method(
        "Dog",
        "constructor",
        &[ast.param("name")],
        &[ast.expr_stmt(ast.call(ast.super_(), &[ast.name("name")]))],
        FunctionFlags::METHOD | FunctionFlags::CONSTRUCTOR,
    );
    let main = ast.function(
        "main",
        &[],
        &[ast.ret(Some(ast.new_(ast.name("Dog"), &[ast.string("rex")])))],
        FunctionFlags::empty(),
    );

    let mut unit = unit("super_ctor");
    unit.add_class(ClassEntry::new("Animal")).unwrap();
    unit.add_class(ClassEntry::new("Dog").extends("Animal")).unwrap();
    for decl in [animal_ctor, dog_ctor, main] {
        unit.add_function(decl).unwrap();
    }
    let module = build(&unit);

    assert_eq!(module.function("Dog_constructor").unwrap().calls_to("Animal_constructor").count(), 1);

    let mut trace = Trace::new(&module);
    let result = trace.run("main", vec![]).unwrap();
    assert_eq!(trace.entered(), ["main", "Dog_constructor", "Animal_constructor"]);
    // Only the root constructor allocates; the derived one returns what
    // super(...) produced.
    let created: Vec<_> = trace.calls_to("kestrel_object_create").collect();
    assert_eq!(created.len(), 1);
    assert_eq!(result, created[0].result);
}

#[test]
fn test_super_constructor_without_parent_constructor_allocates() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let dog_ctor = ast.method(
        "Dog",
        "constructor",
        &[],
        &[ast.expr_stmt(ast.call(ast.super_(), &[]))],
        FunctionFlags::METHOD | FunctionFlags::CONSTRUCTOR,
    );
    let main = ast.function(
        "main",
        &[],
        &[ast.ret(Some(ast.new_(ast.name("Dog"), &[])))],
        FunctionFlags::empty(),
    );

    let mut unit = unit("super_default_ctor");
    unit.add_class(ClassEntry::new("Animal")).unwrap();
    unit.add_class(ClassEntry::new("Dog").extends("Animal")).unwrap();
    unit.add_function(dog_ctor).unwrap();
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let dog_ctor = module.function("Dog_constructor").unwrap();
    assert_eq!(dog_ctor.calls_to("Animal_constructor").count(), 0);
    assert_eq!(dog_ctor.calls_to("kestrel_object_create").count(), 1);

    let mut trace = Trace::new(&module);
    let result = trace.run("main", vec![]).unwrap();
    assert_eq!(trace.entered(), ["main", "Dog_constructor"]);
    let created: Vec<_> = trace.calls_to("kestrel_object_create").collect();
    assert_eq!(created.len(), 1);
    assert_eq!(result, created[0].result);
}

#[test]
fn test_super_constructor_skips_ancestors_without_constructor() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let animal_ctor = ast.method(
        "Animal",
        "constructor",
        &[ast.param("name")],
        &[],
        FunctionFlags::METHOD | FunctionFlags::CONSTRUCTOR,
    );
    let puppy_ctor = ast.method(
        "Puppy",
        "constructor",
        &[ast.param("name")],
        &[ast.expr_stmt(ast.call(ast.super_(), &[ast.name("name")]))],
        FunctionFlags::METHOD | FunctionFlags::CONSTRUCTOR,
    );
    let main = ast.function(
        "main",
        &[],
        &[ast.ret(Some(ast.new_(ast.name("Puppy"), &[ast.string("rex")])))],
        FunctionFlags::empty(),
    );

    let mut unit = unit("super_grandparent");
    unit.add_class(ClassEntry::new("Animal")).unwrap();
    unit.add_class(ClassEntry::new("Dog").extends("Animal")).unwrap();
    unit.add_class(ClassEntry::new("Puppy").extends("Dog")).unwrap();
    for decl in [animal_ctor, puppy_ctor, main] {
        unit.add_function(decl).unwrap();
    }
    let module = build(&unit);

    let puppy_ctor = module.function("Puppy_constructor").unwrap();
    assert_eq!(puppy_ctor.calls_to("Animal_constructor").count(), 1);
    assert_eq!(puppy_ctor.calls_to("Dog_constructor").count(), 0);

    let mut trace = Trace::new(&module);
    let result = trace.run("main", vec![]).unwrap();
    assert_eq!(trace.entered(), ["main", "Puppy_constructor", "Animal_constructor"]);
    let created: Vec<_> = trace.calls_to("kestrel_object_create").collect();
    assert_eq!(created.len(), 1);
    assert_eq!(result, created[0].result);
}

#[test]
fn test_super_method_in_static_context_passes_zero_sentinel() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let speak = ast.method("Animal", "speak", &[], &[ast.ret(Some(ast.this()))], FunctionFlags::METHOD);
    let make = ast.method(
        "Dog",
        "make",
        &[],
        &[ast.ret(Some(ast.method_call(ast.super_(), "speak", &[])))],
        FunctionFlags::METHOD | FunctionFlags::STATIC,
    );
    let main = ast.function(
        "main",
        &[],
        &[ast.ret(Some(ast.method_call(ast.name("Dog"), "make", &[])))],
        FunctionFlags::empty(),
    );

    let mut unit = unit("super_sentinel");
    unit.add_class(ClassEntry::new("Animal").with_method("speak")).unwrap();
    unit.add_class(ClassEntry::new("Dog").extends("Animal").with_static("make"))
        .unwrap();
    for decl in [speak, make, main] {
        unit.add_function(decl).unwrap();
    }
    let module = build(&unit);

    let calls: Vec<&[_]> = module.function("Dog_make").unwrap().calls_to("Animal_speak").collect();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 1);

    let mut trace = Trace::new(&module);
    let result = trace.run("main", vec![]).unwrap();
    assert_eq!(trace.entered(), ["main", "Dog_make", "Animal_speak"]);
    assert_eq!(result, Value::Int(0));
}

#[test]
fn test_super_outside_class_is_reported() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let main = ast.function(
        "main",
        &[],
        &[ast.expr_stmt(ast.method_call(ast.super_(), "speak", &[]))],
        FunctionFlags::empty(),
    );
    let mut unit = unit("super_outside");
    unit.add_function(main).unwrap();

    let (_, diagnostics) = unit.lower();
    assert_eq!(diagnostics.error_count(), 1);
}

// =============================================================================
// Member calls
// =============================================================================

#[test]
fn test_class_static_call_resolves_through_parent() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let create = ast.method(
        "Animal",
        "create",
        &[],
        &[ast.ret(Some(ast.num(7.0)))],
        FunctionFlags::METHOD | FunctionFlags::STATIC,
    );
    let main = ast.function(
        "main",
        &[],
        &[ast.ret(Some(ast.method_call(ast.name("Dog"), "create", &[])))],
        FunctionFlags::empty(),
    );

    let mut unit = unit("class_static");
    unit.add_class(ClassEntry::new("Animal").with_static("create")).unwrap();
    unit.add_class(ClassEntry::new("Dog").extends("Animal")).unwrap();
    unit.add_function(create).unwrap();
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let calls: Vec<&[_]> = module.function("main").unwrap().calls_to("Animal_create").collect();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].is_empty());

    let mut trace = Trace::new(&module);
    assert_eq!(trace.run("main", vec![]).unwrap(), Value::Number(7.0));
    assert_eq!(trace.entered(), ["main", "Animal_create"]);
}

#[test]
fn test_primitive_receiver_is_first_argument() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let main = ast.function(
        "main",
        &[],
        &[ast.ret(Some(ast.method_call(ast.string("a"), "toUpperCase", &[])))],
        FunctionFlags::empty(),
    );

    let mut unit = unit("primitive");
    unit.add_function(main).unwrap();
    let module = build(&unit);
    assert!(module.externals.contains("kestrel_string_to_upper_case"));

    let mut trace = Trace::new(&module);
    let result = trace.run("main", vec![]).unwrap();
    let call = trace.calls_to("kestrel_string_to_upper_case").next().unwrap();
    assert_eq!(call.args, [Value::String("a".into())]);
    assert_eq!(result, call.result);
}

#[test]
fn test_object_literal_method_receives_object_as_this() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let inc = ast.method(
        "counter",
        "inc",
        &[ast.param("by")],
        &[ast.ret(Some(ast.this()))],
        FunctionFlags::METHOD,
    );
    let main = ast.function(
        "main",
        &[],
        &[
            ast.let_("counter", ast.object()),
            ast.ret(Some(ast.method_call(ast.name("counter"), "inc", &[ast.num(1.0)]))),
        ],
        FunctionFlags::empty(),
    );

    let mut unit = unit("object_literal");
    unit.declarations_mut().objects.register("counter", "inc", "counter_inc");
    unit.add_function(inc).unwrap();
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let calls: Vec<&[_]> = module.function("main").unwrap().calls_to("counter_inc").collect();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 2);

    let mut trace = Trace::new(&module);
    let result = trace.run("main", vec![]).unwrap();
    assert_eq!(trace.entered(), ["main", "counter_inc"]);
    let created = trace.calls_to("kestrel_object_create").next().unwrap();
    assert_eq!(result, created.result);
}

// =============================================================================
// Closures
// =============================================================================

#[test]
fn test_returned_closure_keeps_creation_environment() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let adder = ast.function(
        "adder",
        &[ast.param("x")],
        &[
            ast.expr_stmt(ast.method_call(ast.name("console"), "log", &[ast.name("x"), ast.name("base")])),
            ast.ret(Some(ast.name("base"))),
        ],
        FunctionFlags::ARROW,
    );
    let outer = ast.function(
        "outer",
        &[],
        &[
            ast.let_("base", ast.num(10.0)),
            ast.let_("f", ast.function_ref("adder")),
            ast.ret(Some(ast.name("f"))),
        ],
        FunctionFlags::empty(),
    );
    let main = ast.function(
        "main",
        &[],
        &[
            ast.let_("base", ast.num(99.0)),
            ast.let_("g", ast.call_named("outer", &[])),
            ast.ret(Some(ast.call(ast.name("g"), &[ast.num(5.0)]))),
        ],
        FunctionFlags::empty(),
    );

    let mut unit = unit("scenario_c");
    unit.declarations_mut()
        .closures
        .register(ClosureDescriptor::new("adder", ["base"]));
    for decl in [adder, outer, main] {
        unit.add_function(decl).unwrap();
    }
    let module = build(&unit);

    let record = module.env_record("__closure_env_adder").unwrap();
    assert_eq!(record.fields, ["base"]);
    assert!(module.function("adder").unwrap().has_env);

    let mut trace = Trace::new(&module);
    let result = trace.run("main", vec![]).unwrap();
    assert_eq!(result, Value::Number(10.0));
    let log = trace.calls_to("kestrel_console_log").next().unwrap();
    assert_eq!(log.args, [Value::Number(5.0), Value::Number(10.0)]);
}

#[test]
fn test_direct_call_populates_environment_at_call_time() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let show = ast.function(
        "show",
        &[],
        &[ast.expr_stmt(ast.method_call(ast.name("console"), "log", &[ast.name("count")]))],
        FunctionFlags::ARROW,
    );
    let main = ast.function(
        "main",
        &[],
        &[
            ast.let_("count", ast.num(3.0)),
            ast.expr_stmt(ast.call_named("show", &[])),
            ast.assign("count", ast.num(4.0)),
            ast.expr_stmt(ast.call_named("show", &[])),
        ],
        FunctionFlags::empty(),
    );

    let mut unit = unit("call_time_env");
    unit.declarations_mut()
        .closures
        .register(ClosureDescriptor::new("show", ["count"]));
    unit.add_function(show).unwrap();
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let mut trace = Trace::new(&module);
    trace.run("main", vec![]).unwrap();
    let logged: Vec<_> = trace.calls_to("kestrel_console_log").map(|c| c.args.clone()).collect();
    assert_eq!(logged, [vec![Value::Number(3.0)], vec![Value::Number(4.0)]]);
}

#[test]
fn test_missing_capture_is_fatal() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let show = ast.function("show", &[], &[], FunctionFlags::ARROW);
    let main = ast.function(
        "main",
        &[],
        &[ast.expr_stmt(ast.call_named("show", &[]))],
        FunctionFlags::empty(),
    );

    let mut unit = unit("missing_capture");
    unit.declarations_mut()
        .closures
        .register(ClosureDescriptor::new("show", ["nowhere"]));
    unit.add_function(show).unwrap();
    unit.add_function(main).unwrap();

    let (_, diagnostics) = unit.lower();
    assert!(diagnostics.has_fatal());
    assert!(diagnostics.errors().any(|d| d.message.contains("nowhere")));
}

// =============================================================================
// Error recovery
// =============================================================================

#[test]
fn test_unresolved_callee_does_not_stop_the_pass() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let helper = ast.function("helper", &[], &[], FunctionFlags::empty());
    let main = ast.function(
        "main",
        &[],
        &[
            ast.let_("r", ast.call_named("foo", &[])),
            ast.expr_stmt(ast.call_named("helper", &[])),
            ast.expr_stmt(ast.method_call(ast.name("console"), "log", &[ast.name("r")])),
        ],
        FunctionFlags::empty(),
    );

    let mut unit = unit("scenario_d");
    unit.add_function(helper).unwrap();
    unit.add_function(main).unwrap();

    let (module, diagnostics) = unit.lower();
    assert_eq!(diagnostics.error_count(), 1);
    assert!(diagnostics.errors().all(|d| d.message.contains("foo")));

    let main = module.function("main").unwrap();
    assert_eq!(main.calls_to("foo").count(), 0);
    assert_eq!(main.calls_to("helper").count(), 1);

    // The placeholder result flows on as `undefined`.
    let mut trace = Trace::new(&module);
    trace.run("main", vec![]).unwrap();
    let log = trace.calls_to("kestrel_console_log").next().unwrap();
    assert_eq!(log.args, [Value::Undefined]);

    match unit.build() {
        Err(BuildError::Lowering(diagnostics)) => assert_eq!(diagnostics.error_count(), 1),
        other => panic!("expected a lowering failure, got {:?}", other.map(|m| m.name)),
    }
}

#[test]
fn test_arity_mismatch_is_reported() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let main = ast.function(
        "main",
        &[],
        &[ast.expr_stmt(ast.method_call(ast.name("Math"), "sqrt", &[]))],
        FunctionFlags::empty(),
    );
    let mut unit = unit("arity");
    unit.add_function(main).unwrap();

    let (module, diagnostics) = unit.lower();
    assert_eq!(diagnostics.error_count(), 1);
    assert!(!module.externals.contains("kestrel_math_sqrt"));
}

// =============================================================================
// Generators
// =============================================================================

#[test]
fn test_generator_call_builds_handle_and_seeds_slots() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let count = ast.function("count", &[ast.param("from"), ast.param("to")], &[], FunctionFlags::GENERATOR);
    let main = ast.function(
        "main",
        &[],
        &[ast.ret(Some(ast.call_named("count", &[ast.num(1.0), ast.num(3.0)])))],
        FunctionFlags::empty(),
    );

    let mut unit = unit("generator");
    unit.add_function(count).unwrap();
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let mut trace = Trace::new(&module);
    let handle = trace.run("main", vec![]).unwrap();
    // The generator body is not run by the call.
    assert_eq!(trace.entered(), ["main"]);

    let factory = trace.calls_to(GENERATOR_FACTORY).next().unwrap();
    assert_eq!(factory.args, [Value::Function("count".into()), Value::Int(0)]);
    assert_eq!(handle, factory.result);

    let stores: Vec<_> = trace.calls_to(STORE_LOCAL).map(|c| c.args.clone()).collect();
    assert_eq!(
        stores,
        [
            vec![handle.clone(), Value::Int(100), Value::Number(1.0)],
            vec![handle.clone(), Value::Int(101), Value::Number(3.0)],
        ]
    );

    let main = module.function("main").unwrap();
    let tags: Vec<_> = main.tags.values().copied().collect();
    assert_eq!(tags, [ResultTag::Generator]);
}

#[test]
fn test_async_generator_uses_configured_slot_base() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let stream = ast.function(
        "stream",
        &[ast.param("url")],
        &[],
        FunctionFlags::GENERATOR | FunctionFlags::ASYNC,
    );
    let main = ast.function(
        "main",
        &[],
        &[ast.expr_stmt(ast.call_named("stream", &[ast.string("a")]))],
        FunctionFlags::empty(),
    );

    let mut unit = unit("async_generator").with_config(LoweringConfig::new().with_generator_slot_base(8));
    unit.add_function(stream).unwrap();
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let mut trace = Trace::new(&module);
    trace.run("main", vec![]).unwrap();
    assert_eq!(trace.calls_to(GENERATOR_FACTORY).count(), 0);
    let handle = trace.calls_to(ASYNC_GENERATOR_FACTORY).next().unwrap().result.clone();
    let store = trace.calls_to(STORE_LOCAL).next().unwrap();
    assert_eq!(store.args, [handle, Value::Int(8), Value::String("a".into())]);
}

// =============================================================================
// Arguments and defaults
// =============================================================================

#[test]
fn test_omitted_parameters_take_defaults() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let greet = ast.function(
        "greet",
        &[ast.param("name"), ast.param_default("greeting", ast.string("hi")), ast.param("tail")],
        &[ast.expr_stmt(ast.method_call(
            ast.name("console"),
            "log",
            &[ast.name("greeting"), ast.name("name"), ast.name("tail")],
        ))],
        FunctionFlags::empty(),
    );
    let main = ast.function(
        "main",
        &[],
        &[ast.expr_stmt(ast.call_named("greet", &[ast.string("bob")]))],
        FunctionFlags::empty(),
    );

    let mut unit = unit("defaults");
    unit.add_function(greet).unwrap();
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let args: Vec<_> = module.function("main").unwrap().calls_to("greet").collect();
    assert_eq!(args[0].len(), 3);

    let mut trace = Trace::new(&module);
    trace.run("main", vec![]).unwrap();
    let log = trace.calls_to("kestrel_console_log").next().unwrap();
    assert_eq!(
        log.args,
        [Value::String("hi".into()), Value::String("bob".into()), Value::Undefined]
    );
}

#[test]
fn test_function_reference_call_takes_defaults() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let greet = ast.function(
        "greet",
        &[ast.param("name"), ast.param_default("greeting", ast.string("hi"))],
        &[ast.expr_stmt(ast.method_call(
            ast.name("console"),
            "log",
            &[ast.name("greeting"), ast.name("name")],
        ))],
        FunctionFlags::empty(),
    );
    let main = ast.function(
        "main",
        &[],
        &[
            ast.let_("g", ast.name("greet")),
            ast.expr_stmt(ast.call_named("g", &[ast.string("bob")])),
        ],
        FunctionFlags::empty(),
    );

    let mut unit = unit("reference_defaults");
    unit.add_function(greet).unwrap();
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let args: Vec<_> = module.function("main").unwrap().calls_to("greet").collect();
    assert_eq!(args[0].len(), 2);

    let mut trace = Trace::new(&module);
    trace.run("main", vec![]).unwrap();
    let log = trace.calls_to("kestrel_console_log").next().unwrap();
    assert_eq!(log.args, [Value::String("hi".into()), Value::String("bob".into())]);
}

#[test]
fn test_without_padding_only_defaults_are_filled() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let greet = ast.function(
        "greet",
        &[ast.param("name"), ast.param_default("greeting", ast.string("hi")), ast.param("tail")],
        &[],
        FunctionFlags::empty(),
    );
    let main = ast.function(
        "main",
        &[],
        &[ast.expr_stmt(ast.call_named("greet", &[]))],
        FunctionFlags::empty(),
    );

    let config = LoweringConfig::new().with_pad_missing_arguments(false);
    let mut unit = unit("no_padding").with_config(config);
    unit.add_function(greet).unwrap();
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let args: Vec<_> = module.function("main").unwrap().calls_to("greet").collect();
    assert_eq!(args[0].len(), 2);
}

// =============================================================================
// Builtins
// =============================================================================

#[test]
fn test_runtime_symbols_are_declared_once() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let max = |a: f64, b: f64| ast.method_call(ast.name("Math"), "max", &[ast.num(a), ast.num(b)]);
    let main = ast.function(
        "main",
        &[],
        &[ast.expr_stmt(max(1.0, 2.0)), ast.expr_stmt(max(3.0, 4.0))],
        FunctionFlags::empty(),
    );
    let other = ast.function("other", &[], &[ast.expr_stmt(max(5.0, 6.0))], FunctionFlags::empty());

    let mut unit = unit("idempotent");
    unit.add_function(main).unwrap();
    unit.add_function(other).unwrap();
    let module = build(&unit);

    assert_eq!(module.externals.iter().filter(|s| s.name == "kestrel_math_max").count(), 1);
    assert!(module.externals.lookup("kestrel_math_max").unwrap().variadic);
    assert_eq!(module.function("main").unwrap().calls_to("kestrel_math_max").count(), 2);
}

#[test]
fn test_handle_results_chain() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let set = ast.new_(ast.name("Set"), &[]);
    let chained = ast.method_call(ast.method_call(set, "add", &[ast.num(1.0)]), "add", &[ast.num(2.0)]);
    let main = ast.function(
        "main",
        &[],
        &[
            ast.let_("s", chained),
            ast.let_("m", ast.new_(ast.name("Map"), &[])),
            ast.expr_stmt(ast.method_call(ast.name("m"), "set", &[ast.string("k"), ast.name("s")])),
            ast.expr_stmt(ast.method_call(ast.name("m"), "frobnicate", &[ast.num(1.0)])),
        ],
        FunctionFlags::empty(),
    );

    let mut unit = unit("handles");
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let main = module.function("main").unwrap();
    assert_eq!(main.calls_to("kestrel_set_create").count(), 1);
    assert_eq!(main.calls_to("kestrel_set_add").count(), 2);
    assert_eq!(main.calls_to("kestrel_map_set").count(), 1);
    assert!(main.tags.values().all(|tag| *tag == ResultTag::Set));

    let generic = module.externals.lookup("kestrel_map_frobnicate").unwrap();
    assert!(generic.variadic);

    let mut trace = Trace::new(&module);
    trace.run("main", vec![]).unwrap();
    let map = trace.calls_to("kestrel_map_create").next().unwrap().result.clone();
    let set = trace.calls_to("kestrel_set_add").nth(1).unwrap().result.clone();
    let stored = trace.calls_to("kestrel_map_set").next().unwrap();
    assert_eq!(stored.args, [map, Value::String("k".into()), set]);
}

#[test]
fn test_literal_conversions_fold() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let main = ast.function(
        "main",
        &[],
        &[ast.ret(Some(ast.call_named("parseInt", &[ast.string("42")])))],
        FunctionFlags::empty(),
    );

    let mut unit = unit("fold");
    unit.add_function(main).unwrap();
    let module = build(&unit);
    assert_eq!(module.function("main").unwrap().calls().count(), 0);
    assert_eq!(Trace::new(&module).run("main", vec![]).unwrap(), Value::Number(42.0));

    let mut unit = Unit::with_standard_library("no_fold")
        .unwrap()
        .with_config(LoweringConfig::new().with_fold_constants(false));
    unit.add_function(main).unwrap();
    let module = build(&unit);
    let args: Vec<_> = module.function("main").unwrap().calls_to("kestrel_global_parse_int").collect();
    assert_eq!(args.len(), 1);
    assert_eq!(args[0].len(), 2);
}

#[test]
fn test_local_binding_shadows_reserved_global() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let mine = ast.function("mine", &[ast.param("s")], &[], FunctionFlags::empty());
    let main = ast.function(
        "main",
        &[],
        &[
            ast.let_("parseInt", ast.function_ref("mine")),
            ast.expr_stmt(ast.call_named("parseInt", &[ast.string("7")])),
        ],
        FunctionFlags::empty(),
    );

    let mut unit = unit("shadowing");
    unit.add_function(mine).unwrap();
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let main = module.function("main").unwrap();
    assert_eq!(main.calls_to("mine").count(), 1);
    assert!(!module.externals.contains("kestrel_global_parse_int"));
}

#[test]
fn test_imported_namespace_and_function() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let main = ast.function(
        "main",
        &[],
        &[
            ast.expr_stmt(ast.method_call(ast.name("path"), "join", &[ast.string("a"), ast.string("b")])),
            ast.expr_stmt(ast.call_named("exists", &[ast.string("a")])),
            ast.expr_stmt(ast.method_call(ast.name("path"), "toNamespacedPath", &[ast.string("a")])),
        ],
        FunctionFlags::empty(),
    );

    let mut unit = unit("imports");
    let imports = &mut unit.declarations_mut().imports;
    imports.import_namespace("path", BuiltinModule::Path);
    imports.import_function("exists", BuiltinModule::Fs, "existsSync");
    unit.add_function(main).unwrap();
    let module = build(&unit);

    let main = module.function("main").unwrap();
    assert_eq!(main.calls_to("kestrel_path_join").count(), 1);
    assert_eq!(main.calls_to("kestrel_fs_exists_sync").count(), 1);
    assert_eq!(main.calls_to("kestrel_path_to_namespaced_path").count(), 1);
}
