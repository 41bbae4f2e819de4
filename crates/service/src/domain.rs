//! Request and response contracts, kept apart from the storage records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use models::{course, enrollment, student};

/// Student creation input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCreate {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Course creation input; `description` may be omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnrollmentCreate {
    pub student_id: i32,
    pub course_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub student_id: i32,
    pub course_id: i32,
    pub enrolled_on: NaiveDate,
}

/// Student with the courses it is enrolled in; courses carry no student list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentWithCourses {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub courses: Vec<Course>,
}

/// Course with its enrolled students; students carry no course list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseWithStudents {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub students: Vec<Student>,
}

impl From<student::Model> for Student {
    fn from(m: student::Model) -> Self {
        Self { id: m.id, name: m.name, email: m.email }
    }
}

impl From<course::Model> for Course {
    fn from(m: course::Model) -> Self {
        Self { id: m.id, title: m.title, description: m.description }
    }
}

impl From<enrollment::Model> for Enrollment {
    fn from(m: enrollment::Model) -> Self {
        Self { student_id: m.student_id, course_id: m.course_id, enrolled_on: m.enrolled_on }
    }
}

impl StudentWithCourses {
    pub fn new(s: student::Model, courses: Vec<course::Model>) -> Self {
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
            courses: courses.into_iter().map(Course::from).collect(),
        }
    }
}

impl CourseWithStudents {
    pub fn new(c: course::Model, students: Vec<student::Model>) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            students: students.into_iter().map(Student::from).collect(),
        }
    }
}
