//! Registration validation at registry build time.

use serde_json::{json, Value};

use treestate::path::PathId;
use treestate::read::{
    NodeBuilder, NodeHandler, ReadResult, ReadTransaction, SingularReadHandler,
};
use treestate::registry::{ConfigError, ReaderRegistryBuilder};

struct MarkerHandler(&'static str);

impl SingularReadHandler for MarkerHandler {
    fn read_current(
        &self,
        _path: &PathId,
        builder: &mut NodeBuilder,
        _txn: &mut ReadTransaction,
    ) -> ReadResult<()> {
        builder.insert("marker".to_string(), json!(self.0));
        Ok(())
    }

    fn merge(&self, parent: &mut NodeBuilder, value: Value) {
        parent.insert(self.0.to_string(), value);
    }
}

fn handler(name: &'static str) -> NodeHandler {
    NodeHandler::singular(MarkerHandler(name))
}

#[test]
fn registry_debug_summarizes_roots() {
    let registry = ReaderRegistryBuilder::new()
        .register(PathId::root("device"), handler("device"))
        .register(PathId::root("system"), handler("system"))
        .build()
        .expect("valid registration set");

    assert_eq!(format!("{registry:?}"), "ReaderRegistry { roots: 2 }");
}

#[test]
fn duplicate_registration_is_rejected() {
    let err = ReaderRegistryBuilder::new()
        .register(PathId::root("device"), handler("first"))
        .register(PathId::root("device"), handler("second"))
        .build()
        .expect_err("duplicate path");

    let ConfigError::DuplicateRegistration(path) = err else {
        panic!("expected duplicate registration, got {err}");
    };
    assert_eq!(path, PathId::root("device"));
}

#[test]
fn missing_container_handler_is_rejected() {
    // Only the grandchild is registered; nothing covers "device".
    let err = ReaderRegistryBuilder::new()
        .register(
            PathId::root("device").child("clock"),
            handler("clock"),
        )
        .build()
        .expect_err("no handler for intermediate container");

    let ConfigError::MissingHandler(path) = err else {
        panic!("expected missing handler, got {err}");
    };
    assert_eq!(path, PathId::root("device"));
}

#[test]
fn structural_registration_fills_the_container() {
    ReaderRegistryBuilder::new()
        .register_structural(PathId::root("device"))
        .register(
            PathId::root("device").child("clock"),
            handler("clock"),
        )
        .build()
        .expect("structural handler covers the container");
}

#[test]
fn claim_colliding_with_a_registration_is_rejected() {
    let err = ReaderRegistryBuilder::new()
        .register_subtree(
            PathId::root("routing"),
            vec![PathId::root("routing").child("tables")],
            handler("routing"),
        )
        .register(
            PathId::root("routing").child("tables"),
            handler("tables"),
        )
        .build()
        .expect_err("claimed path has its own handler");

    assert!(matches!(err, ConfigError::ClaimCollision { .. }));
}

#[test]
fn claim_colliding_with_another_claim_is_rejected() {
    let err = ReaderRegistryBuilder::new()
        .register_subtree(
            PathId::root("routing"),
            vec![PathId::root("routing").child("tables").child("static")],
            handler("routing"),
        )
        .register_subtree(
            PathId::root("routing").child("tables"),
            vec![PathId::root("routing").child("tables").child("static")],
            handler("tables"),
        )
        .build()
        .expect_err("two owners for one claim");

    assert!(matches!(err, ConfigError::ClaimCollision { .. }));
}

#[test]
fn claim_outside_the_subtree_is_rejected() {
    let err = ReaderRegistryBuilder::new()
        .register_subtree(
            PathId::root("routing"),
            vec![PathId::root("system").child("ntp")],
            handler("routing"),
        )
        .build()
        .expect_err("claim does not descend from the reader");

    assert!(matches!(err, ConfigError::ClaimOutsideSubtree { .. }));
}

#[test]
fn claim_equal_to_the_root_is_rejected() {
    let err = ReaderRegistryBuilder::new()
        .register_subtree(
            PathId::root("routing"),
            vec![PathId::root("routing")],
            handler("routing"),
        )
        .build()
        .expect_err("claim must be strictly below the root");

    assert!(matches!(err, ConfigError::ClaimTooShort(_)));
}
