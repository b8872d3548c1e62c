/// Integration tests for the Tempo API
///
/// These tests drive the full router against a real database:
/// - Session-gated personal task lifecycle and time-slot derivation
/// - Project board authorization (owner / editor / viewer)
/// - Cascade deletes, label catalog rules, admin surface
///
/// They connect to `DATABASE_URL` and skip when it is not set, so the
/// suite passes without infrastructure.

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use tempo_shared::models::user::User;
use tower::Service as _;

/// Builds a context or skips the test when no database is reachable
macro_rules! ctx_or_skip {
    () => {
        match TestContext::new().await {
            Some(ctx) => ctx,
            None => {
                eprintln!("skipping: DATABASE_URL not set or unreachable");
                return;
            }
        }
    };
}

/// Asserts a status, dumping the body on mismatch
async fn assert_status(
    response: axum::response::Response,
    expected: StatusCode,
) -> serde_json::Value {
    let status = response.status();
    if status != expected {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        panic!(
            "Expected {}, got {}: {}",
            expected,
            status,
            String::from_utf8_lossy(&body)
        );
    }
    common::body_json(response).await
}

#[tokio::test]
async fn test_task_create_and_fetch_round_trip() {
    let mut ctx = ctx_or_skip!();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                "/tasks",
                Some(&ctx.cookie()),
                Some(json!({
                    "title": "Morning standup",
                    "shortDescription": "Daily sync",
                    "startTime": "2026-08-26T09:00:00Z",
                    "endTime": "2026-08-26T09:15:00Z",
                    "subtasks": [{"title": "prepare notes"}]
                })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;

    assert_eq!(body["message"], "Task created successfully");
    assert_eq!(body["task"]["title"], "Morning standup");
    // 09:00 UTC falls in the morning bucket
    assert_eq!(body["task"]["timeSlot"], "morning");
    let task_id = body["task"]["id"].as_str().unwrap().to_string();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "GET",
                &format!("/tasks/{}", task_id),
                Some(&ctx.cookie()),
                None,
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["task"]["id"], task_id.as_str());
    assert_eq!(body["task"]["shortDescription"], "Daily sync");
    assert_eq!(body["task"]["subtasks"][0]["title"], "prepare notes");
    assert_eq!(body["task"]["subtasks"][0]["completed"], false);

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_task_time_slot_follows_start_hour() {
    let mut ctx = ctx_or_skip!();

    // Boundary starts for each bucket
    for (start, end, slot) in [
        ("2026-08-26T05:00:00Z", "2026-08-26T06:00:00Z", "morning"),
        ("2026-08-26T11:00:00Z", "2026-08-26T12:00:00Z", "noon"),
        ("2026-08-26T14:00:00Z", "2026-08-26T15:00:00Z", "afternoon"),
        ("2026-08-26T18:00:00Z", "2026-08-26T19:00:00Z", "evening"),
        ("2026-08-26T04:59:00Z", "2026-08-26T06:00:00Z", "evening"),
    ] {
        let body = assert_status(
            ctx.app
                .call(TestContext::request(
                    "POST",
                    "/tasks",
                    Some(&ctx.cookie()),
                    Some(json!({
                        "title": format!("slot check {}", slot),
                        "startTime": start,
                        "endTime": end,
                    })),
                ))
                .await
                .unwrap(),
            StatusCode::CREATED,
        )
        .await;
        assert_eq!(body["task"]["timeSlot"], slot, "start {}", start);
    }

    // Retiming re-derives the slot
    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                "/tasks",
                Some(&ctx.cookie()),
                Some(json!({
                    "title": "movable",
                    "startTime": "2026-08-26T09:00:00Z",
                    "endTime": "2026-08-26T10:00:00Z",
                })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let task_id = body["task"]["id"].as_str().unwrap().to_string();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "PATCH",
                &format!("/tasks/{}/time-slot", task_id),
                Some(&ctx.cookie()),
                Some(json!({
                    "startTime": "2026-08-26T15:00:00Z",
                    "endTime": "2026-08-26T16:00:00Z",
                })),
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["task"]["timeSlot"], "afternoon");

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_task_rejects_inverted_time_range() {
    let mut ctx = ctx_or_skip!();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                "/tasks",
                Some(&ctx.cookie()),
                Some(json!({
                    "title": "backwards",
                    "startTime": "2026-08-26T10:00:00Z",
                    "endTime": "2026-08-26T09:00:00Z",
                })),
            ))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["message"], "endTime must not be before startTime");

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_task_requires_session() {
    let mut ctx = ctx_or_skip!();

    let response = ctx
        .app
        .call(TestContext::request("GET", "/tasks", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_task_hidden_from_other_users() {
    let mut ctx = ctx_or_skip!();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                "/tasks",
                Some(&ctx.cookie()),
                Some(json!({
                    "title": "private",
                    "startTime": "2026-08-26T09:00:00Z",
                    "endTime": "2026-08-26T10:00:00Z",
                })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let task_id = body["task"]["id"].as_str().unwrap().to_string();

    let other = common::create_user(&ctx.db, "intruder").await;
    let other_cookie = format!("token={}", common::session_for(&other));

    let response = ctx
        .app
        .call(TestContext::request(
            "GET",
            &format!("/tasks/{}", task_id),
            Some(&other_cookie),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup(&[other.id]).await;
}

#[tokio::test]
async fn test_subtask_update_preserves_siblings() {
    let mut ctx = ctx_or_skip!();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                "/tasks",
                Some(&ctx.cookie()),
                Some(json!({
                    "title": "checklist",
                    "startTime": "2026-08-26T09:00:00Z",
                    "endTime": "2026-08-26T10:00:00Z",
                    "subtasks": [
                        {"title": "first", "order": 0},
                        {"title": "second", "order": 1}
                    ]
                })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let task_id = body["task"]["id"].as_str().unwrap().to_string();
    let mut subtasks = body["task"]["subtasks"].clone();
    subtasks[0]["completed"] = json!(true);

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "PUT",
                &format!("/tasks/{}", task_id),
                Some(&ctx.cookie()),
                Some(json!({ "subtasks": subtasks })),
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["task"]["subtasks"][0]["completed"], true);
    assert_eq!(body["task"]["subtasks"][1]["completed"], false);
    assert_eq!(body["task"]["subtasks"][1]["title"], "second");
    // Ids are stable across the rewrite
    assert_eq!(body["task"]["subtasks"][1]["id"], subtasks[1]["id"]);

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_viewer_promotion_gates_board_mutations() {
    let mut ctx = ctx_or_skip!();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                "/projects",
                Some(&ctx.cookie()),
                Some(json!({ "name": "Launch plan" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let project_id = body["project"]["id"].as_str().unwrap().to_string();

    assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/{}/columns", project_id),
                Some(&ctx.cookie()),
                Some(json!({ "name": "Backlog" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;

    let viewer = common::create_user(&ctx.db, "viewer").await;
    let viewer_cookie = format!("token={}", common::session_for(&viewer));

    assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/{}/members", project_id),
                Some(&ctx.cookie()),
                Some(json!({ "userId": viewer.id, "role": "viewer" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;

    // Viewers can see the board but not reshape it
    assert_status(
        ctx.app
            .call(TestContext::request(
                "GET",
                &format!("/projects/{}", project_id),
                Some(&viewer_cookie),
                None,
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;

    let response = ctx
        .app
        .call(TestContext::request(
            "POST",
            &format!("/projects/{}/columns", project_id),
            Some(&viewer_cookie),
            Some(json!({ "name": "Viewer column" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_status(
        ctx.app
            .call(TestContext::request(
                "PUT",
                &format!("/projects/{}/members/{}/role", project_id, viewer.id),
                Some(&ctx.cookie()),
                Some(json!({ "role": "editor" })),
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/{}/columns", project_id),
                Some(&viewer_cookie),
                Some(json!({ "name": "Editor column" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;

    // New columns land after the existing ones
    assert_eq!(body["column"]["position"], 1);

    ctx.cleanup(&[viewer.id]).await;
}

#[tokio::test]
async fn test_project_delete_removes_board() {
    let mut ctx = ctx_or_skip!();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                "/projects",
                Some(&ctx.cookie()),
                Some(json!({ "name": "Disposable" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let project_id = body["project"]["id"].as_str().unwrap().to_string();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/{}/columns", project_id),
                Some(&ctx.cookie()),
                Some(json!({ "name": "Doomed" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let column_id = body["column"]["id"].as_str().unwrap().to_string();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/columns/{}/tasks", column_id),
                Some(&ctx.cookie()),
                Some(json!({ "title": "Doomed task" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let task_id = body["task"]["id"].as_str().unwrap().to_string();

    assert_status(
        ctx.app
            .call(TestContext::request(
                "DELETE",
                &format!("/projects/{}", project_id),
                Some(&ctx.cookie()),
                None,
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;

    // Everything under the project is gone with it
    for (method, uri) in [
        ("GET", format!("/projects/{}", project_id)),
        ("PUT", format!("/projects/columns/{}", column_id)),
        ("PUT", format!("/projects/tasks/{}", task_id)),
    ] {
        let body = if method == "PUT" {
            Some(json!({ "name": "x", "title": "x" }))
        } else {
            None
        };
        let response = ctx
            .app
            .call(TestContext::request(method, &uri, Some(&ctx.cookie()), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
    }

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_move_task_rejects_foreign_column() {
    let mut ctx = ctx_or_skip!();

    let make_board = |name: &str| {
        let name = name.to_string();
        let cookie = ctx.cookie();
        let mut app = ctx.app.clone();
        async move {
            let body = assert_status(
                app.call(TestContext::request(
                    "POST",
                    "/projects",
                    Some(&cookie),
                    Some(json!({ "name": name })),
                ))
                .await
                .unwrap(),
                StatusCode::CREATED,
            )
            .await;
            let project_id = body["project"]["id"].as_str().unwrap().to_string();

            let body = assert_status(
                app.call(TestContext::request(
                    "POST",
                    &format!("/projects/{}/columns", project_id),
                    Some(&cookie),
                    Some(json!({ "name": "Todo" })),
                ))
                .await
                .unwrap(),
                StatusCode::CREATED,
            )
            .await;
            body["column"]["id"].as_str().unwrap().to_string()
        }
    };

    let column_a = make_board("Board A").await;
    let column_b = make_board("Board B").await;

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/columns/{}/tasks", column_a),
                Some(&ctx.cookie()),
                Some(json!({ "title": "stuck" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let task_id = body["task"]["id"].as_str().unwrap().to_string();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "PATCH",
                &format!("/projects/tasks/{}/move", task_id),
                Some(&ctx.cookie()),
                Some(json!({ "columnId": column_b })),
            ))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["message"], "Target column belongs to a different project");

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_board_task_reminder_clears_on_null() {
    let mut ctx = ctx_or_skip!();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                "/projects",
                Some(&ctx.cookie()),
                Some(json!({ "name": "Reminders" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let project_id = body["project"]["id"].as_str().unwrap().to_string();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/{}/columns", project_id),
                Some(&ctx.cookie()),
                Some(json!({ "name": "Todo" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let column_id = body["column"]["id"].as_str().unwrap().to_string();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/columns/{}/tasks", column_id),
                Some(&ctx.cookie()),
                Some(json!({
                    "title": "nudge me",
                    "emailReminder": "2026-09-01T08:00:00Z"
                })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let task_id = body["task"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["task"]["emailReminder"], "2026-09-01T08:00:00Z");

    // Updating an unrelated field leaves the reminder alone
    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "PUT",
                &format!("/projects/tasks/{}", task_id),
                Some(&ctx.cookie()),
                Some(json!({ "title": "nudge me later" })),
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["task"]["emailReminder"], "2026-09-01T08:00:00Z");

    // An explicit null clears it
    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "PUT",
                &format!("/projects/tasks/{}", task_id),
                Some(&ctx.cookie()),
                Some(json!({ "emailReminder": null })),
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(body["task"]["emailReminder"].is_null());

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_comments_allowed_for_viewers() {
    let mut ctx = ctx_or_skip!();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                "/projects",
                Some(&ctx.cookie()),
                Some(json!({ "name": "Discussion" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let project_id = body["project"]["id"].as_str().unwrap().to_string();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/{}/columns", project_id),
                Some(&ctx.cookie()),
                Some(json!({ "name": "Open" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let column_id = body["column"]["id"].as_str().unwrap().to_string();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/columns/{}/tasks", column_id),
                Some(&ctx.cookie()),
                Some(json!({ "title": "debated" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let task_id = body["task"]["id"].as_str().unwrap().to_string();

    let viewer = common::create_user(&ctx.db, "commenter").await;
    let viewer_cookie = format!("token={}", common::session_for(&viewer));

    assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/{}/members", project_id),
                Some(&ctx.cookie()),
                Some(json!({ "userId": viewer.id, "role": "viewer" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/tasks/{}/comments", task_id),
                Some(&viewer_cookie),
                Some(json!({ "content": "looks good" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let comment = &body["task"]["comments"][0];
    assert_eq!(comment["content"], "looks good");
    assert_eq!(comment["user"]["id"].as_str().unwrap(), viewer.id.to_string());
    let comment_id = comment["id"].as_str().unwrap().to_string();

    // Removing a comment is a structural edit, so viewers cannot
    let response = ctx
        .app
        .call(TestContext::request(
            "DELETE",
            &format!("/projects/tasks/{}/comments/{}", task_id, comment_id),
            Some(&viewer_cookie),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_status(
        ctx.app
            .call(TestContext::request(
                "DELETE",
                &format!("/projects/tasks/{}/comments/{}", task_id, comment_id),
                Some(&ctx.cookie()),
                None,
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;

    ctx.cleanup(&[viewer.id]).await;
}

#[tokio::test]
async fn test_invite_unknown_email_is_not_persisted() {
    let mut ctx = ctx_or_skip!();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                "/projects",
                Some(&ctx.cookie()),
                Some(json!({ "name": "Invite target" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let project_id = body["project"]["id"].as_str().unwrap().to_string();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                &format!("/projects/{}/members/invite", project_id),
                Some(&ctx.cookie()),
                Some(json!({ "email": format!("{}@nowhere.example", uuid::Uuid::new_v4()) })),
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["invited"], false);
    assert_eq!(
        body["message"],
        "Invitation email sent successfully. User will be added when they register."
    );

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "GET",
                &format!("/projects/{}", project_id),
                Some(&ctx.cookie()),
                None,
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["project"]["members"].as_array().unwrap().len(), 0);

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_label_writes_require_admin() {
    let mut ctx = ctx_or_skip!();

    // Catalog reads are public
    let body = assert_status(
        ctx.app
            .call(TestContext::request("GET", "/labels", None, None))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(!body["labels"].as_array().unwrap().is_empty());

    let response = ctx
        .app
        .call(TestContext::request(
            "POST",
            "/labels",
            Some(&ctx.cookie()),
            Some(json!({ "name": "Blocked", "type": "status" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_default_labels_cannot_be_deleted() {
    let mut ctx = ctx_or_skip!();
    ctx.make_admin(ctx.user.id).await;

    let body = assert_status(
        ctx.app
            .call(TestContext::request("GET", "/labels?type=status", None, None))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;
    let default_label = body["labels"]
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["isDefault"] == true)
        .expect("seeded default labels should exist")
        .clone();

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "DELETE",
                &format!("/labels/{}", default_label["id"].as_str().unwrap()),
                Some(&ctx.cookie()),
                None,
            ))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["message"], "Default labels cannot be deleted");

    // Custom labels delete fine
    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "POST",
                "/labels",
                Some(&ctx.cookie()),
                Some(json!({ "name": format!("Temp {}", uuid::Uuid::new_v4()), "type": "priority" })),
            ))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await;
    let custom_id = body["label"]["id"].as_str().unwrap().to_string();

    assert_status(
        ctx.app
            .call(TestContext::request(
                "DELETE",
                &format!("/labels/{}", custom_id),
                Some(&ctx.cookie()),
                None,
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;

    let response = ctx
        .app
        .call(TestContext::request(
            "GET",
            &format!("/labels/{}", custom_id),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_admin_surface_gated_and_lists_users() {
    let mut ctx = ctx_or_skip!();

    let response = ctx
        .app
        .call(TestContext::request(
            "GET",
            "/admin/users",
            Some(&ctx.cookie()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    ctx.make_admin(ctx.user.id).await;

    let uri = format!("/admin/users?search={}&page=1&limit=10", ctx.user.email);
    let body = assert_status(
        ctx.app
            .call(TestContext::request("GET", &uri, Some(&ctx.cookie()), None))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["users"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["pages"], 1);
    assert_eq!(body["pagination"]["page"], 1);

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_root_admin_cannot_be_locked() {
    let mut ctx = ctx_or_skip!();
    ctx.make_admin(ctx.user.id).await;

    let root = User::find_root_admin(&ctx.db)
        .await
        .unwrap()
        .expect("an admin exists");

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "PATCH",
                &format!("/admin/users/{}/status", root.id),
                Some(&ctx.cookie()),
                Some(json!({ "isActive": false })),
            ))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["message"], "Cannot lock root admin");

    // Regular accounts lock and unlock
    let target = common::create_user(&ctx.db, "lockable").await;

    let body = assert_status(
        ctx.app
            .call(TestContext::request(
                "PATCH",
                &format!("/admin/users/{}/status", target.id),
                Some(&ctx.cookie()),
                Some(json!({ "isActive": false })),
            ))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["user"]["isActive"], false);

    // A locked account's session stops working
    let locked_cookie = format!("token={}", common::session_for(&target));
    let response = ctx
        .app
        .call(TestContext::request(
            "GET",
            "/tasks",
            Some(&locked_cookie),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup(&[target.id]).await;
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut ctx = ctx_or_skip!();

    let body = assert_status(
        ctx.app
            .call(TestContext::request("GET", "/health", None, None))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    ctx.cleanup(&[]).await;
}
