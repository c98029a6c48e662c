use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{ClassStatus, UserRole};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::user::get_profile,
        handlers::user::update_profile,
        handlers::user::change_password,
        handlers::user::get_favorites,
        handlers::user::add_favorite,
        handlers::user::remove_favorite,
        handlers::payment::create_payment,
        handlers::payment::list_payments,
        handlers::payment::my_payments,
        handlers::payment::get_payment,
        handlers::payment::update_payment,
        handlers::payment::delete_payment,
        handlers::payment::restore_payment,
        handlers::class::list_classes,
        handlers::class::get_class,
        handlers::class::update_class,
        handlers::class::delete_class,
        handlers::sheet::list_sheets,
        handlers::sheet::get_sheet,
        handlers::sheet::create_sheet,
        handlers::sheet::update_sheet,
        handlers::sheet::delete_sheet,
        handlers::study_session::list_study_sessions,
        handlers::study_session::create_study_session,
        handlers::study_session::get_study_session,
        handlers::study_session::update_study_session,
        handlers::study_session::delete_study_session,
        handlers::study_session::share_study_session,
        handlers::class_summary::create_class_summary,
        handlers::class_summary::list_class_summaries,
        handlers::class_summary::get_class_summary,
        handlers::class_summary::update_class_summary,
        handlers::class_summary::delete_class_summary,
        handlers::notification::list_notifications,
        handlers::notification::mark_notification_read,
        handlers::notification::mark_all_notifications_read,
        handlers::admin::list_users,
        handlers::admin::get_user,
        handlers::admin::update_user,
        handlers::admin::get_overview,
    ),
    components(
        schemas(
            UserRole,
            ClassStatus,
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            AdminUpdateUserRequest,
            UserResponse,
            UserStatistics,
            ProfileResponse,
            AuthResponse,
            AdminOverview,
            CreatePaymentRequest,
            UpdatePaymentRequest,
            PaymentQuery,
            PaymentResponse,
            PaymentWithClassesResponse,
            UpdateClassRequest,
            ClassQuery,
            ClassResponse,
            CreateSheetRequest,
            UpdateSheetRequest,
            SheetQuery,
            SheetResponse,
            CreateStudySessionRequest,
            UpdateStudySessionRequest,
            StudySessionQuery,
            StudySessionResponse,
            CreateClassSummaryRequest,
            UpdateClassSummaryRequest,
            ClassSummaryQuery,
            ClassSummaryResponse,
            NotificationQuery,
            NotificationResponse,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "user", description = "User profile and favorites API"),
        (name = "payments", description = "Payment management API"),
        (name = "classes", description = "Class schedule API"),
        (name = "sheets", description = "Sheet music library API"),
        (name = "study-sessions", description = "Study session API"),
        (name = "class-summaries", description = "Class summary API"),
        (name = "notifications", description = "Notification API"),
        (name = "admin", description = "Admin management API"),
    ),
    info(
        title = "Allegro Backend API",
        version = "1.0.0",
        description = "Allegro music studio backend REST API documentation",
        contact(
            name = "API Support",
            email = "allegro.studio@outlook.com"
        )
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
