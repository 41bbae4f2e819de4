use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{course, enrollment};

pub const EMAIL_TAKEN: &str = "Email already registered";
const EMAIL_MAX_LEN: usize = 254;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("valid email regex")
});

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique, indexed)]
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Enrollment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Enrollment => Entity::has_many(enrollment::Entity).into() }
    }
}

impl Related<enrollment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Enrollment.def() }
}

impl Related<course::Entity> for Entity {
    fn to() -> RelationDef { enrollment::Relation::Course.def() }
    fn via() -> Option<RelationDef> { Some(enrollment::Relation::Student.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name must not be empty".into())); }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if email.len() > EMAIL_MAX_LEN || !EMAIL_RE.is_match(email) {
        return Err(errors::ModelError::Validation("value is not a valid email address".into()));
    }
    Ok(())
}

/// Lowercase the domain part; the local part keeps its case.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_ascii_lowercase()),
        None => email.to_string(),
    }
}

/// Insert a student with a normalized email; a taken address becomes `Conflict`.
pub async fn create<C: ConnectionTrait>(db: &C, name: &str, email: &str) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_email(email)?;
    let am = ActiveModel {
        name: Set(name.to_string()),
        email: Set(normalize_email(email)),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::from_insert(e, EMAIL_TAKEN))
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

/// Offset/limit page in insertion (id) order.
pub async fn page<C: ConnectionTrait>(db: &C, skip: u64, limit: u64) -> Result<Vec<Model>, DbErr> {
    Entity::find().order_by_asc(Column::Id).offset(skip).limit(limit).all(db).await
}

/// Courses the student is enrolled in, ordered by course id.
pub async fn courses_of<C: ConnectionTrait>(db: &C, student: &Model) -> Result<Vec<course::Model>, DbErr> {
    student.find_related(course::Entity).order_by_asc(course::Column::Id).all(db).await
}
