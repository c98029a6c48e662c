use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        // 学生端和管理端域名不固定，放开来源限制
        .allowed_origin_fn(|_, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        // 前端携带 Authorization 头时需要
        .supports_credentials()
        .max_age(3600)
}
