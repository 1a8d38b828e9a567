//! Sample entity types shared across backend test suites.

use docstore_core::{impl_entity_identity, Entity, EntityId, Reference, StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// A sample entity with plain data fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Identifier.
    #[serde(default)]
    pub id: EntityId,
    /// Customer name.
    pub name: String,
    /// Home city.
    pub city: String,
}

impl Customer {
    /// Creates a customer with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            city: city.into(),
        }
    }
}

impl Entity for Customer {
    fn collection_name() -> &'static str {
        "customer"
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

impl_entity_identity!(Customer);

/// A sample entity carrying a typed reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Identifier.
    #[serde(default)]
    pub id: EntityId,
    /// Product name.
    pub name: String,
    /// The customer this product belongs to.
    pub customer: Reference<Customer>,
}

impl Product {
    /// Creates a product referencing the given customer.
    #[must_use]
    pub fn new(name: impl Into<String>, customer: &Customer) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            customer: Reference::from(customer),
        }
    }
}

impl Entity for Product {
    fn collection_name() -> &'static str {
        "product"
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

impl_entity_identity!(Product);

/// A sample entity with a failing validation case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Identifier.
    #[serde(default)]
    pub id: EntityId,
    /// Account holder.
    pub name: String,
    /// Contact address; must contain an `@`.
    pub email: String,
}

impl Account {
    /// Creates an account with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Entity for Account {
    fn collection_name() -> &'static str {
        "account"
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> StoreResult<()> {
        if !self.email.contains('@') {
            return Err(StoreError::validation(format!(
                "not an email address: {:?}",
                self.email
            )));
        }
        Ok(())
    }
}

impl_entity_identity!(Account);
