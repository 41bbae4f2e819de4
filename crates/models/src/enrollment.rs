use chrono::NaiveDate;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{course, student};

pub const ALREADY_ENROLLED: &str = "Student already enrolled in this course";

/// Join row; the (student_id, course_id) pair is the primary key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_id: i32,
    pub enrolled_on: Date,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Student,
    Course,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Student => Entity::belongs_to(student::Entity)
                .from(Column::StudentId)
                .to(student::Column::Id)
                .into(),
            Relation::Course => Entity::belongs_to(course::Entity)
                .from(Column::CourseId)
                .to(course::Column::Id)
                .into(),
        }
    }
}

impl Related<student::Entity> for Entity {
    fn to() -> RelationDef { Relation::Student.def() }
}

impl Related<course::Entity> for Entity {
    fn to() -> RelationDef { Relation::Course.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_pair<C: ConnectionTrait>(db: &C, student_id: i32, course_id: i32) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id((student_id, course_id)).one(db).await
}

/// Insert the pair; a primary-key collision becomes `Conflict`.
pub async fn create<C: ConnectionTrait>(db: &C, student_id: i32, course_id: i32, enrolled_on: NaiveDate) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        student_id: Set(student_id),
        course_id: Set(course_id),
        enrolled_on: Set(enrolled_on),
    };
    Entity::insert(am)
        .exec_without_returning(db)
        .await
        .map_err(|e| errors::ModelError::from_insert(e, ALREADY_ENROLLED))?;
    Ok(Model { student_id, course_id, enrolled_on })
}

/// Offset/limit page ordered by the primary key, so paging is stable on
/// every backend.
pub async fn page<C: ConnectionTrait>(db: &C, skip: u64, limit: u64) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .order_by_asc(Column::StudentId)
        .order_by_asc(Column::CourseId)
        .offset(skip)
        .limit(limit)
        .all(db)
        .await
}
