//! Resolves `entity` + `action` selectors into an entity handler.

use crate::entities::{admin, invoice, preorder, product, student};
use crate::error::AppError;
use crate::response::Reply;
use crate::service::Payload;
use crate::state::AppState;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Student,
    Product,
    Admin,
    PreOrder,
    Invoice,
}

impl Entity {
    pub fn name(self) -> &'static str {
        match self {
            Entity::Student => "student",
            Entity::Product => "product",
            Entity::Admin => "admin",
            Entity::PreOrder => "preorder",
            Entity::Invoice => "invoice",
        }
    }
}

/// Accepts the English selectors and the table-style aliases (`mahasiswa`, `produk`, `pre_order`, `tagihan`).
impl FromStr for Entity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" | "mahasiswa" => Ok(Entity::Student),
            "product" | "produk" => Ok(Entity::Product),
            "admin" => Ok(Entity::Admin),
            "preorder" | "pre_order" => Ok(Entity::PreOrder),
            "invoice" | "tagihan" => Ok(Entity::Invoice),
            other => Err(AppError::UnknownEntity(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub fn parse(entity: Entity, s: &str) -> Result<Self, AppError> {
        match s {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            other => Err(AppError::UnknownAction {
                entity: entity.name(),
                action: other.to_string(),
            }),
        }
    }
}

fn selector(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Validate both selectors, then run exactly one entity operation.
pub async fn dispatch(
    state: &AppState,
    entity: Option<&str>,
    action: Option<&str>,
    payload: &Payload,
) -> Result<Reply, AppError> {
    let (Some(entity), Some(action)) = (selector(entity), selector(action)) else {
        return Err(AppError::MissingSelector);
    };
    let entity: Entity = entity.parse()?;
    let action = Action::parse(entity, action)?;
    tracing::debug!(entity = entity.name(), action = ?action, "dispatch");

    match (entity, action) {
        (Entity::Student, Action::Create) => student::create(state, payload).await,
        (Entity::Student, Action::Read) => student::read(state).await,
        (Entity::Student, Action::Update) => student::update(state, payload).await,
        (Entity::Student, Action::Delete) => student::delete(state, payload).await,
        (Entity::Product, Action::Create) => product::create(state, payload).await,
        (Entity::Product, Action::Read) => product::read(state).await,
        (Entity::Product, Action::Update) => product::update(state, payload).await,
        (Entity::Product, Action::Delete) => product::delete(state, payload).await,
        (Entity::Admin, Action::Create) => admin::create(state, payload).await,
        (Entity::Admin, Action::Read) => admin::read(state).await,
        (Entity::Admin, Action::Update) => admin::update(state, payload).await,
        (Entity::Admin, Action::Delete) => admin::delete(state, payload).await,
        (Entity::PreOrder, Action::Create) => preorder::create(state, payload).await,
        (Entity::PreOrder, Action::Read) => preorder::read(state).await,
        (Entity::PreOrder, Action::Update) => preorder::update(state, payload).await,
        (Entity::PreOrder, Action::Delete) => preorder::delete(state, payload).await,
        (Entity::Invoice, Action::Create) => invoice::create(state, payload).await,
        (Entity::Invoice, Action::Read) => invoice::read(state).await,
        (Entity::Invoice, Action::Update) => invoice::update(state, payload).await,
        (Entity::Invoice, Action::Delete) => invoice::delete(state, payload).await,
    }
}
