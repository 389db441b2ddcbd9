use crate::{
    error::Error,
    model::{FieldModel, HostModel},
    notify::ChangeEvent,
    property::{DynamicModel, PropertyBag, PropertyHost, SchemaScope, reset_registry},
    value::{FieldKind, Value},
};
use std::{cell::RefCell, rc::Rc};

///
/// Account
///
/// Fixed-schema test host: two static fields plus a shared-scope bag.
///

struct Account {
    login: String,
    attempts: i64,
    bag: PropertyBag,
}

const ACCOUNT_FIELDS: [FieldModel; 2] = [
    FieldModel {
        name: "Login",
        kind: FieldKind::Text,
    },
    FieldModel {
        name: "Attempts",
        kind: FieldKind::Int,
    },
];

impl Account {
    fn new() -> Self {
        Self {
            login: String::new(),
            attempts: 0,
            bag: PropertyBag::shared(Self::type_key()),
        }
    }
}

impl HostModel for Account {
    fn type_key() -> &'static str {
        "tests.Account"
    }

    fn static_fields(&self) -> &'static [FieldModel] {
        &ACCOUNT_FIELDS
    }

    fn static_value(&self, name: &str) -> Option<Value> {
        match name {
            "Login" => Some(Value::Text(self.login.clone())),
            "Attempts" => Some(Value::Int(self.attempts)),
            _ => None,
        }
    }

    fn write_static(&mut self, name: &str, value: Value) -> Result<bool, Error> {
        match (name, value) {
            ("Login", Value::Text(text)) => {
                let changed = self.login != text;
                self.login = text;
                Ok(changed)
            }
            ("Attempts", Value::Int(n)) => {
                let changed = self.attempts != n;
                self.attempts = n;
                Ok(changed)
            }
            (other, _) => Err(Error::PropertyNotFound(other.to_string())),
        }
    }
}

impl PropertyHost for Account {
    fn bag(&self) -> &PropertyBag {
        &self.bag
    }
}

fn property_spy(
    bag: &PropertyBag,
) -> (Rc<RefCell<Vec<String>>>, crate::notify::Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = bag.subscribe(move |event| {
        if let ChangeEvent::Property { name } = event {
            sink.borrow_mut().push(name.clone());
        }
    });
    (seen, sub)
}

#[test]
fn static_fields_read_and_write_through() {
    reset_registry();
    let mut account = Account::new();

    assert_eq!(account.get_value("Login"), Ok(Value::Text(String::new())));
    account
        .set_value("Login", Value::from("alice"))
        .expect("set");
    assert_eq!(account.get_value("Login"), Ok(Value::from("alice")));
    assert_eq!(account.login, "alice");
}

#[test]
fn static_write_notifies_only_on_change() {
    reset_registry();
    let mut account = Account::new();
    let (seen, _sub) = property_spy(&account.bag);

    account.set_value("Attempts", Value::Int(3)).expect("set");
    account.set_value("Attempts", Value::Int(3)).expect("set");
    account.set_value("Attempts", Value::Int(4)).expect("set");

    assert_eq!(*seen.borrow(), vec!["Attempts", "Attempts"]);
}

#[test]
fn static_write_rejects_wrong_kind() {
    reset_registry();
    let mut account = Account::new();

    let err = account
        .set_value("Attempts", Value::from("three"))
        .expect_err("must fail");
    assert!(matches!(err, Error::TypeMismatch { name, .. } if name == "Attempts"));
    assert_eq!(account.attempts, 0);
}

#[test]
fn static_name_shadows_same_named_dynamic_descriptor() {
    reset_registry();
    let mut account = Account::new();
    account.declare_property("Login", FieldKind::Int, Vec::new());

    account
        .set_value("Login", Value::from("bob"))
        .expect("static wins on write");
    assert_eq!(account.get_value("Login"), Ok(Value::from("bob")));

    // the dynamic descriptor is unreachable behind the static field
    let err = account.set_value("Login", Value::Int(1)).expect_err("static kind");
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn declared_but_never_set_reads_the_default() {
    reset_registry();
    let account = Account::new();
    account.declare_property("Score", FieldKind::Int, Vec::new());

    assert_eq!(account.get_value("Score"), Ok(Value::Int(0)));
}

#[test]
fn unknown_name_is_property_not_found() {
    reset_registry();
    let mut account = Account::new();

    assert_eq!(
        account.get_value("Missing"),
        Err(Error::PropertyNotFound("Missing".to_string()))
    );
    assert_eq!(
        account.set_value("Missing", Value::Int(1)),
        Err(Error::PropertyNotFound("Missing".to_string()))
    );
}

#[test]
fn dynamic_type_mismatch_leaves_the_stored_value() {
    reset_registry();
    let mut account = Account::new();
    account.declare_property("Score", FieldKind::Int, Vec::new());
    account.set_value("Score", Value::Int(10)).expect("set");

    let err = account
        .set_value("Score", Value::from("ten"))
        .expect_err("must fail");
    assert!(matches!(err, Error::TypeMismatch { .. }));
    assert_eq!(account.get_value("Score"), Ok(Value::Int(10)));
}

#[test]
fn dynamic_write_notifies_only_on_change() {
    reset_registry();
    let mut account = Account::new();
    account.declare_property("Score", FieldKind::Int, Vec::new());
    let (seen, _sub) = property_spy(&account.bag);

    account.set_value("Score", Value::Int(1)).expect("set");
    account.set_value("Score", Value::Int(1)).expect("set");
    account.set_value("Score", Value::Int(2)).expect("set");

    assert_eq!(*seen.borrow(), vec!["Score", "Score"]);
}

#[test]
fn null_needs_an_optional_kind() {
    reset_registry();
    let mut account = Account::new();
    account.declare_property("Nickname", FieldKind::option(FieldKind::Text), Vec::new());
    account.declare_property("Score", FieldKind::Int, Vec::new());

    account.set_value("Nickname", Value::from("ace")).expect("set");
    account.set_value("Nickname", Value::Null).expect("null ok");
    assert_eq!(account.get_value("Nickname"), Ok(Value::Null));

    let err = account.set_value("Score", Value::Null).expect_err("must fail");
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn shared_scope_declarations_are_visible_across_instances() {
    reset_registry();
    let first = Account::new();
    first.declare_property("Score", FieldKind::Int, Vec::new());

    let second = Account::new();
    assert_eq!(second.bag().scope(), SchemaScope::Shared);
    assert_eq!(second.get_value("Score"), Ok(Value::Int(0)));
}

#[test]
fn shared_values_stay_per_instance() {
    reset_registry();
    let mut first = Account::new();
    first.declare_property("Score", FieldKind::Int, Vec::new());
    first.set_value("Score", Value::Int(5)).expect("set");

    let second = Account::new();
    assert_eq!(second.get_value("Score"), Ok(Value::Int(0)));
}

#[test]
fn redeclare_is_a_no_op_keeping_the_first_kind() {
    reset_registry();
    let mut account = Account::new();
    account.declare_property("Score", FieldKind::Int, Vec::new());
    account.declare_property("Score", FieldKind::Text, Vec::new());

    account.set_value("Score", Value::Int(1)).expect("int kind kept");
    let err = account
        .set_value("Score", Value::from("one"))
        .expect_err("text rejected");
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn dynamic_model_schemas_are_per_instance() {
    reset_registry();
    let mut first = DynamicModel::new();
    let second = DynamicModel::new();
    assert_eq!(first.bag().scope(), SchemaScope::Instance);

    first.declare_property("AdHoc", FieldKind::Text, Vec::new());
    first.set_value("AdHoc", Value::from("x")).expect("set");

    assert_eq!(
        second.get_value("AdHoc"),
        Err(Error::PropertyNotFound("AdHoc".to_string()))
    );
}

#[test]
fn descriptor_keeps_attributes_and_owner() {
    reset_registry();
    let account = Account::new();
    account.declare_property(
        "Score",
        FieldKind::Int,
        vec!["persisted".to_string(), "audit".to_string()],
    );

    let descriptor = account.bag().descriptor("Score").expect("declared");
    assert_eq!(descriptor.owner, "tests.Account");
    assert_eq!(descriptor.attributes, vec!["persisted", "audit"]);
    assert!(account.resolves("Score"));
    assert!(account.resolves("Login"));
    assert!(!account.resolves("Missing"));
}

#[test]
fn reset_registry_detaches_new_instances() {
    reset_registry();
    let first = Account::new();
    first.declare_property("Score", FieldKind::Int, Vec::new());

    reset_registry();
    let second = Account::new();
    assert_eq!(
        second.get_value("Score"),
        Err(Error::PropertyNotFound("Score".to_string()))
    );
}
