use crate::models::{
    CaseDetailResponse, CaseListResponse, CaseRecord, CaseResponse, ErrorResponse,
    GenerateCaseRequest, SaveCaseRequest,
};
use crate::routes::mentors::AppState;
use crate::services::ArchiveError;
use actix_web::{web, HttpResponse, Responder};
use std::fmt::Write;
use uuid::Uuid;
use validator::Validate;

const LANGUAGE_STYLE: &str = "professional";

/// Configure case-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/generate-case", web::post().to(generate_case))
        .route("/save-case", web::post().to(save_case))
        .route("/cases", web::get().to(list_cases))
        .route("/cases/{id}", web::get().to(get_case))
        .route("/cases/{id}", web::delete().to(delete_case));
}

/// Generate a case document for a chosen mentor
///
/// POST /api/generate-case
async fn generate_case(
    state: web::Data<AppState>,
    req: web::Json<GenerateCaseRequest>,
) -> impl Responder {
    let req = req.into_inner();
    let prompt = build_case_prompt(&req);

    tracing::info!(
        "Generating case for mentor {}, direction: {}",
        req.mentor.name,
        req.direction.as_deref().unwrap_or("unspecified")
    );

    let temperature = state.oracle.generation_temperature();
    let case = match state.oracle.generate(&prompt, temperature).await {
        Ok(case) => case,
        Err(e) => {
            tracing::error!("Case generation failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Case generation failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let record = CaseRecord {
        id: Uuid::new_v4().to_string(),
        timestamp: chrono::Utc::now(),
        mentor: req.mentor,
        direction: req.direction.unwrap_or_default(),
        position: req.position.unwrap_or_default(),
        customer_problems: req.customer_problems,
        core_content: req.core_content.unwrap_or_default(),
        highlights: req.highlights.unwrap_or_default(),
        language_style: LANGUAGE_STYLE.to_string(),
        case,
    };

    // the generated case is still returned when persistence fails
    if let Err(e) = state.archive.save(&record) {
        tracing::error!("Failed to persist generated case {}: {}", record.id, e);
    }

    HttpResponse::Ok().json(CaseResponse {
        case: record.case,
        case_id: record.id,
        timestamp: record.timestamp,
    })
}

/// Persist a case document, typically after manual editing
///
/// POST /api/save-case
async fn save_case(state: web::Data<AppState>, req: web::Json<SaveCaseRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let id = req
        .case_id
        .as_deref()
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap_or_else(Uuid::new_v4);

    let record = CaseRecord {
        id: id.to_string(),
        timestamp: chrono::Utc::now(),
        mentor: req.mentor.unwrap_or_default(),
        direction: req.direction.unwrap_or_default(),
        position: req.position.unwrap_or_default(),
        customer_problems: req.customer_problems,
        core_content: req.core_content.unwrap_or_default(),
        highlights: req.highlights.unwrap_or_default(),
        language_style: LANGUAGE_STYLE.to_string(),
        case: req.case,
    };

    match state.archive.save(&record) {
        Ok(()) => HttpResponse::Ok().json(CaseResponse {
            case: record.case,
            case_id: record.id,
            timestamp: record.timestamp,
        }),
        Err(e) => {
            tracing::error!("Failed to save case: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to save case".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// List case history, newest first
///
/// GET /api/cases
async fn list_cases(state: web::Data<AppState>) -> impl Responder {
    match state.archive.list() {
        Ok(cases) => HttpResponse::Ok().json(CaseListResponse {
            count: cases.len(),
            cases,
        }),
        Err(e) => {
            tracing::error!("Failed to list cases: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list cases".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Fetch a single case
///
/// GET /api/cases/{id}
async fn get_case(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match state.archive.get(&id) {
        Ok(record) => HttpResponse::Ok().json(CaseDetailResponse { case: record }),
        Err(e) => archive_error_response(&id, e),
    }
}

/// Delete a case
///
/// DELETE /api/cases/{id}
async fn delete_case(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match state.archive.delete(&id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "deleted": id })),
        Err(e) => archive_error_response(&id, e),
    }
}

fn archive_error_response(id: &str, e: ArchiveError) -> HttpResponse {
    match e {
        ArchiveError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Case not found".to_string(),
            message: id.to_string(),
            status_code: 404,
        }),
        other => {
            tracing::error!("Archive operation failed for case {}: {}", id, other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Archive operation failed".to_string(),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}

fn problem_description(code: &str) -> &str {
    match code {
        "interview" => "面试碰壁，多次在面试环节被淘汰",
        "exam" => "笔试碰壁，技术测试或笔试环节表现不佳",
        "resume" => "简历投递无反馈，投递了大量简历但石沉大海",
        "career" => "职业规划不明确，不知道自己的优势和适合的方向",
        other => other,
    }
}

/// Build the two-part narrative prompt from the mentor and the client's
/// situation. Unset mentor fields are left out rather than rendered as
/// placeholders; the generator should not narrate absence.
fn build_case_prompt(req: &GenerateCaseRequest) -> String {
    let direction = req.direction.as_deref().unwrap_or("未指定");
    let problems = if req.customer_problems.is_empty() {
        "未指定".to_string()
    } else {
        req.customer_problems
            .iter()
            .map(|code| problem_description(code))
            .collect::<Vec<_>>()
            .join("、")
    };

    let mut prompt = String::from("请根据以下信息生成一份留学生求职案例报告，用于促单展示。\n\n导师信息：\n");
    let _ = writeln!(prompt, "- 姓名：{}", req.mentor.name);
    for (label, value) in [
        ("公司", &req.mentor.company),
        ("职位", &req.mentor.position),
        ("擅长方向", &req.mentor.direction),
        ("教育背景", &req.mentor.education),
        ("详细介绍", &req.mentor.information),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            let _ = writeln!(prompt, "- {}：{}", label, value);
        }
    }

    let _ = writeln!(prompt, "\n客户求职信息：\n- 求职方向：{}", direction);
    if let Some(position) = req.position.as_deref().filter(|p| !p.trim().is_empty()) {
        let _ = writeln!(prompt, "- 求职岗位：{}", position);
    }
    let _ = writeln!(prompt, "- 客户遇到的问题：{}", problems);
    if let Some(highlights) = req.highlights.as_deref().filter(|h| !h.trim().is_empty()) {
        let _ = writeln!(prompt, "- 需要突出的内容：{}", highlights);
    }

    let _ = write!(
        prompt,
        "\n请生成一份案例报告，严格分为两部分：\n\n\
         【第一部分：背景介绍】\n\
         1. 导师背景：简要介绍导师的核心优势，突出其在{}领域的专业能力和成功经验。\n\
         2. 学员背景：杜撰一位海归留学生学员（可来自美国、英国、澳洲、加拿大等），在国内求职，\
         求职方向与“{}”类似但不要完全一致，简要介绍学历背景、专业和留学经历。\n\n\
         【第二部分：成功故事】\n\
         写一个约500字的详细故事：\n\
         1. 辅导前的情况（约150字）：描述学员遇到的困难（重点是：{}）以及焦虑、迷茫的情绪状态。\n\
         2. 辅导过程和转折点（约200字）：描述导师如何介入、具体的辅导内容（简历优化、面试技巧、\
         职业规划、内推资源、模拟面试等）和1-2个关键转折点。\n\
         3. 辅导后的成果和对比（约150字）：对比辅导前后的状态，最终成功上岸大厂名企，\
         强调导师辅导的关键作用和价值。\n\n\
         要求：\n- 语言专业严谨，但要有感染力\n- 内容真实可信，逻辑清晰\n\
         - 故事要有强烈的对比感，能够有效促单\n",
        direction, direction, problems,
    );

    if let Some(highlights) = req.highlights.as_deref().filter(|h| !h.trim().is_empty()) {
        let _ = writeln!(prompt, "- 特别强调：{}", highlights);
    }

    prompt.push_str("\n请直接输出两部分内容，不需要额外的标题或格式说明。");
    prompt
}
