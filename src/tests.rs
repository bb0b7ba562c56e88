use proptest::prelude::*;

use crate::{
    ast::{Node, SimpleForm},
    config::CompilerConfig,
    parser::build,
    to_sql::resolve,
    translate::{CompileErrorKind, Compiler, Error, postgres::Postgres, translate},
};

fn postgres() -> Compiler {
    Compiler::for_driver("postgres").expect("postgres is registered")
}

#[test]
fn postgres_table() {
    let tests = [
        (
            "(year(CreatedOn) == ?) && (month(CreatedOn) == ?)",
            "(date_part('year', created_on) = ?) AND (date_part('month', created_on) = ?)",
        ),
        ("year(Id)", "date_part('year', id)"),
        ("UserName like '%%adm\\%in%%'", "user_name like '%%adm\\%in%%'"),
        ("month(ID)", "date_part('month', id)"),
        ("day(ID)", "date_part('day', id)"),
        ("hour(ID)", "date_part('hour', id)"),
        ("minute(ID)", "date_part('minute', id)"),
        ("second(ID)", "date_part('second', id)"),
        ("ID", "id"),
        (
            "DepartmetCode == ? || BirdBirthday >= ?",
            "departmet_code = ? OR bird_birthday >= ?",
        ),
        (
            "(concat(FirstName,' ', LastName)) like ?",
            "(concat(first_name, ' ', last_name)) like ?",
        ),
        ("JoinYear != 2020", "join_year != 2020"),
    ];

    let compiler = postgres();
    for (input, expected) in tests {
        assert_eq!(compiler.compile(input).unwrap(), expected, "input: {input}");
    }
}

#[test]
fn postgres_failures() {
    let compiler = postgres();

    let err = compiler.compile("year(Id,code)").unwrap_err();
    assert!(matches!(
        err.kind,
        CompileErrorKind::Resolve(Error::ArityError { found: 2, .. })
    ));

    let err = compiler.compile("1abc == ?").unwrap_err();
    assert_eq!(
        err.kind,
        CompileErrorKind::Resolve(Error::InvalidIdentifier("1abc".into()))
    );

    let err = compiler.compile("concat(a,,b)").unwrap_err();
    assert!(matches!(err.kind, CompileErrorKind::Build(_)));
    assert!(err.to_string().contains("concat(a,,b)"));

    assert!(compiler.compile("").is_err());
}

#[test]
fn long_chains_are_rejected_not_overflowed() {
    let chain = |n: usize| vec!["id == ?"; n].join(" or ");
    let compiler = postgres();

    let sql = compiler.compile(&chain(200)).unwrap();
    assert_eq!(sql, vec!["id = ?"; 200].join(" or "));

    let err = compiler.compile(&chain(300)).unwrap_err();
    assert!(matches!(
        err.kind,
        CompileErrorKind::Build(crate::parser::Error::MalformedExpression {
            reason: "expression nested too deeply",
            ..
        })
    ));

    let deep = format!("{}a{}", "(".repeat(400), ")".repeat(400));
    let err = compiler.compile(&deep).unwrap_err();
    assert!(matches!(err.kind, CompileErrorKind::Build(_)));
}

#[test]
fn out_of_range_number_is_not_a_constant() {
    let err = postgres().compile("Id == 99999999999999999999999").unwrap_err();
    assert_eq!(
        err.kind,
        CompileErrorKind::Resolve(Error::InvalidIdentifier("99999999999999999999999".into()))
    );
}

#[test]
fn invalid_identifier_on_a_handmade_tree() {
    let mut tree = Node::field("1abc");
    assert_eq!(
        translate(&mut tree, &Postgres::default()),
        Err(Error::InvalidIdentifier("1abc".into()))
    );
}

#[test]
fn fresh_tree_per_resolution() {
    // A resolved tree keeps its rewrites, resolving it again through a
    //  dialect is not the same as resolving the source
    let mut tree = build("Price == ?").unwrap();
    assert_eq!(translate(&mut tree, &Postgres::default()).unwrap(), "price = ?");
    assert_eq!(tree.operator(), "=");
    assert_eq!(tree.children()[0].value(), "price");
}

#[test]
fn from_config() {
    let config = CompilerConfig {
        driver: "sqlite".into(),
        strict: true,
    };
    let compiler = Compiler::from_config(&config).unwrap();
    assert_eq!(compiler.dialect().name(), "sqlite");
    assert_eq!(
        compiler.compile("year(CreatedOn) == ?").unwrap(),
        "strftime('%Y', created_on) = ?"
    );
    assert!(matches!(
        compiler.compile("t.x == ?").unwrap_err().kind,
        CompileErrorKind::Resolve(Error::UnresolvedReference(_))
    ));

    let config = CompilerConfig {
        driver: "db2".into(),
        strict: false,
    };
    assert_eq!(
        Compiler::from_config(&config).unwrap_err(),
        Error::UnknownDriver("db2".into())
    );
}

#[test]
fn shared_between_threads() {
    let compiler = postgres();
    std::thread::scope(|s| {
        let handles: Vec<_> = ["year", "month", "day", "hour"]
            .into_iter()
            .map(|unit| {
                let compiler = &compiler;
                s.spawn(move || compiler.compile(&format!("{unit}(ShipDate) > ?")))
            })
            .collect();
        for (handle, unit) in handles.into_iter().zip(["year", "month", "day", "hour"]) {
            assert_eq!(
                handle.join().unwrap().unwrap(),
                format!("date_part('{unit}', ship_date) > ?")
            );
        }
    });
}

#[test]
fn simple_form_ignores_groupings() {
    let grouped = build("(a + b) * c").unwrap();
    let flat = build("a + b * c").unwrap();
    assert_ne!(grouped.to_string(), flat.to_string());
    assert_eq!(SimpleForm(&grouped).to_string(), SimpleForm(&flat).to_string());
}

const CANONICAL_OPERATORS: &[&str] = &[
    "or", "and", "||", "&&", "==", "=", "!=", "<>", "<=", ">=", "<", ">", "like", "+", "-",
    "*", "/", "%", "^",
];

fn canonical_expr() -> impl Strategy<Value = String> {
    let atom = prop_oneof![
        "[a-z]",
        (0u32..10_000).prop_map(|n| n.to_string()),
        Just("?".to_string()),
    ];
    atom.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| format!("({e})")),
            (
                inner.clone(),
                prop::sample::select(CANONICAL_OPERATORS),
                inner
            )
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
        ]
    })
}

proptest! {
    #[test]
    fn canonical_round_trip(expr in canonical_expr()) {
        let tree = build(&expr).unwrap();
        prop_assert_eq!(tree.to_string(), expr);
    }

    #[test]
    fn identity_resolve_matches_reconstruction(expr in canonical_expr()) {
        let mut tree = build(&expr).unwrap();
        let expected = tree.to_string();
        let resolved = resolve(&mut tree, |_| Ok::<(), ()>(())).unwrap();
        prop_assert_eq!(resolved, expected);
    }
}
