use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{enrollment, student};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
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

impl Related<student::Entity> for Entity {
    fn to() -> RelationDef { enrollment::Relation::Student.def() }
    fn via() -> Option<RelationDef> { Some(enrollment::Relation::Course.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    if title.trim().is_empty() { return Err(errors::ModelError::Validation("title must not be empty".into())); }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, title: &str, description: Option<&str>) -> Result<Model, errors::ModelError> {
    validate_title(title)?;
    let am = ActiveModel {
        title: Set(title.to_string()),
        description: Set(description.map(str::to_string)),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

/// Offset/limit page in insertion (id) order.
pub async fn page<C: ConnectionTrait>(db: &C, skip: u64, limit: u64) -> Result<Vec<Model>, DbErr> {
    Entity::find().order_by_asc(Column::Id).offset(skip).limit(limit).all(db).await
}

/// Students enrolled in the course, ordered by student id.
pub async fn students_of<C: ConnectionTrait>(db: &C, course: &Model) -> Result<Vec<student::Model>, DbErr> {
    course.find_related(student::Entity).order_by_asc(student::Column::Id).all(db).await
}
