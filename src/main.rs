use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use allegro_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 创建JWT服务
    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // 创建服务
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let user_service = UserService::new(pool.clone());
    let payment_service = PaymentService::new(pool.clone());
    let class_service = ClassService::new(pool.clone());
    let sheet_service = SheetService::new(pool.clone());
    let class_summary_service = ClassSummaryService::new(pool.clone());
    let notification_service = NotificationService::new(pool.clone());
    let study_session_service =
        StudySessionService::new(pool.clone(), notification_service.clone());

    // 种子管理员账号（配置提供时）
    if let (Some(email), Some(password)) = (&config.admin.email, &config.admin.password) {
        let name = config.admin.name.as_deref().unwrap_or("Admin");
        auth_service
            .ensure_admin(email, password, name)
            .await
            .expect("Failed to ensure admin account");
    }

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(class_service.clone()))
            .app_data(web::Data::new(sheet_service.clone()))
            .app_data(web::Data::new(class_summary_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .app_data(web::Data::new(study_session_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::user_config)
                    .configure(handlers::payment_config)
                    .configure(handlers::class_config)
                    .configure(handlers::sheet_config)
                    .configure(handlers::study_session_config)
                    .configure(handlers::class_summary_config)
                    .configure(handlers::notification_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
