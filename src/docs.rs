use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller as auth;
use crate::modules::auth::model as auth_model;
use crate::modules::colleges::controller as colleges;
use crate::modules::colleges::model as college_model;
use crate::modules::consultants::controller as consultants;
use crate::modules::consultants::model as consultant_model;
use crate::modules::resources::controller as resources;
use crate::modules::resources::model as resource_model;
use crate::modules::students::controller as students;
use crate::modules::students::model as student_model;
use crate::modules::users::controller as users;
use crate::modules::users::model as user_model;
use crate::utils::pagination::{PaginationMeta, PaginationParams};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Admitly API",
        description = "Multi-tenant admissions platform: verified registration, \
                       role profiles, consultant assignment and public college search.",
    ),
    paths(
        auth::register,
        auth::verify_email,
        auth::verify_phone,
        auth::resend_email_otp,
        auth::resend_phone_otp,
        auth::login,
        auth::change_password,
        auth::forgot_password,
        auth::reset_password_confirm,
        users::me,
        users::profile_status,
        users::list_users,
        students::my_profile,
        students::update_my_profile,
        students::list_students,
        consultants::my_profile,
        consultants::update_my_profile,
        consultants::list_consultants,
        consultants::approve_consultant,
        colleges::my_profile,
        colleges::update_my_profile,
        colleges::search_colleges,
        colleges::college_detail,
        resources::list_courses,
        resources::create_course,
        resources::update_course,
        resources::delete_course,
        resources::list_events,
        resources::create_event,
        resources::update_event,
        resources::delete_event,
        resources::list_gallery,
        resources::create_gallery_item,
        resources::update_gallery_item,
        resources::delete_gallery_item,
        resources::list_faculty,
        resources::create_faculty,
        resources::update_faculty,
        resources::delete_faculty,
        resources::list_hostels,
        resources::create_hostel,
        resources::update_hostel,
        resources::delete_hostel,
    ),
    components(schemas(
        auth_model::RegisterRequest,
        auth_model::RegisterResponse,
        auth_model::VerifyEmailRequest,
        auth_model::VerifyPhoneRequest,
        auth_model::VerifyResponse,
        auth_model::ResendEmailOtpRequest,
        auth_model::ResendPhoneOtpRequest,
        auth_model::LoginRequest,
        auth_model::LoginResponse,
        auth_model::ChangePasswordRequest,
        auth_model::ForgotPasswordRequest,
        auth_model::ResetPasswordConfirmRequest,
        auth_model::MessageResponse,
        user_model::User,
        user_model::UserType,
        user_model::PaginatedUsersResponse,
        user_model::ProfileStatusResponse,
        student_model::StudentProfile,
        student_model::UpdateStudentProfileRequest,
        student_model::PaginatedStudentsResponse,
        consultant_model::ConsultantProfile,
        consultant_model::ConsultantType,
        consultant_model::UpdateConsultantProfileRequest,
        consultant_model::PaginatedConsultantsResponse,
        college_model::CollegeProfile,
        college_model::UpdateCollegeProfileRequest,
        college_model::CollegeSummary,
        college_model::PaginatedCollegesResponse,
        college_model::CollegeDetailResponse,
        resource_model::Course,
        resource_model::CourseRequest,
        resource_model::Event,
        resource_model::EventRequest,
        resource_model::GalleryItem,
        resource_model::GalleryItemRequest,
        resource_model::Faculty,
        resource_model::FacultyRequest,
        resource_model::Hostel,
        resource_model::HostelRequest,
        PaginationMeta,
        PaginationParams,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, verification and sessions"),
        (name = "Users", description = "Account lookups"),
        (name = "Students", description = "Student profiles"),
        (name = "Consultants", description = "Consultant profiles and approval"),
        (name = "Colleges", description = "College profiles and public search"),
        (name = "Resources", description = "College-owned courses, events, gallery, faculty and hostels"),
    )
)]
pub struct ApiDoc;
