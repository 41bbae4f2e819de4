use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct BannerDoc {
    #[schema(example = "Student Course Management API is running")]
    pub message: String,
    #[schema(example = "development")]
    pub env: String,
}

#[derive(ToSchema)]
pub struct StorageHealthDoc {
    #[schema(example = "connected")]
    pub state: String,
    #[schema(example = "postgres")]
    pub backend: String,
    pub attempts: u32,
    pub degraded: bool,
}

#[derive(ToSchema)]
pub struct HealthDoc {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "connected")]
    pub database: String,
    pub test_result: Option<i32>,
    pub error: Option<String>,
    pub storage: StorageHealthDoc,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub detail: String,
}

#[derive(ToSchema)]
pub struct StudentCreateDoc {
    #[schema(example = "Jane Smith")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
}

#[derive(ToSchema)]
pub struct StudentDoc { pub id: i32, pub name: String, pub email: String }

#[derive(ToSchema)]
pub struct CourseCreateDoc {
    #[schema(example = "Web Development")]
    pub title: String,
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct CourseDoc { pub id: i32, pub title: String, pub description: Option<String> }

#[derive(ToSchema)]
pub struct EnrollmentCreateDoc { pub student_id: i32, pub course_id: i32 }

#[derive(ToSchema)]
pub struct EnrollmentDoc {
    pub student_id: i32,
    pub course_id: i32,
    #[schema(example = "2024-09-01", format = Date)]
    pub enrolled_on: String,
}

#[derive(ToSchema)]
pub struct StudentWithCoursesDoc {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub courses: Vec<CourseDoc>,
}

#[derive(ToSchema)]
pub struct CourseWithStudentsDoc {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub students: Vec<StudentDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::system::root,
        crate::routes::system::health,
        crate::routes::students::create,
        crate::routes::students::get,
        crate::routes::students::list,
        crate::routes::courses::create,
        crate::routes::courses::get,
        crate::routes::courses::list,
        crate::routes::enrollments::enroll,
        crate::routes::enrollments::list,
    ),
    components(
        schemas(
            BannerDoc,
            StorageHealthDoc,
            HealthDoc,
            ErrorDoc,
            StudentCreateDoc,
            StudentDoc,
            CourseCreateDoc,
            CourseDoc,
            EnrollmentCreateDoc,
            EnrollmentDoc,
            StudentWithCoursesDoc,
            CourseWithStudentsDoc,
        )
    ),
    tags(
        (name = "system"),
        (name = "students"),
        (name = "courses"),
        (name = "enrollments")
    )
)]
pub struct ApiDoc;
