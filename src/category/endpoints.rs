//! Route handlers for listing, creating and deleting categories.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    CategoryId, Error, Ledger, UserID,
    category::{Category, CategoryPayload},
    extract::{ApiJson, ApiPath},
};

/// A route handler that returns the categories of the logged in user.
pub async fn get_categories_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error> {
    ledger.list_categories(user_id).map(Json)
}

/// A route handler for creating a new category, responds with 201 and the new category.
pub async fn create_category_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    ApiJson(payload): ApiJson<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let new_category = payload.try_into()?;

    let category = ledger.create_category(user_id, new_category)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// A route handler for deleting a category, responds with 204 on success.
pub async fn delete_category_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<StatusCode, Error> {
    ledger.delete_category(user_id, category_id)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod category_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_app_state, get_test_server, logged_in_user},
    };

    #[tokio::test]
    async fn create_then_list_categories() {
        let state = get_test_app_state();
        let server = get_test_server(state.clone());
        let (user_id, cookie) = logged_in_user(&server, &state, "alice@example.com").await;

        let response = server
            .post(endpoints::CATEGORIES)
            .add_cookie(cookie.clone())
            .json(&json!({ "name": " Food ", "type": "expense", "userId": 999 }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let created = response.json::<Value>();
        assert_eq!(created["name"], "Food");
        assert_eq!(created["kind"], "expense");
        assert_eq!(created["userId"], user_id.as_i64());
        assert_eq!(created["icon"], "💰");
        assert_eq!(created["color"], "from-blue-500 to-blue-600");

        let response = server.get(endpoints::CATEGORIES).add_cookie(cookie).await;

        response.assert_status_ok();
        let categories = response.json::<Value>();
        assert_eq!(categories.as_array().unwrap().len(), 1);
        assert_eq!(categories[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn create_category_rejects_invalid_payloads() {
        let state = get_test_app_state();
        let server = get_test_server(state.clone());
        let (_, cookie) = logged_in_user(&server, &state, "alice@example.com").await;

        let payloads = [
            json!({ "name": "  ", "kind": "expense" }),
            json!({ "name": "Food", "kind": "transfer" }),
            json!({ "kind": "expense" }),
        ];

        for payload in payloads {
            let response = server
                .post(endpoints::CATEGORIES)
                .add_cookie(cookie.clone())
                .json(&payload)
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            assert!(response.json::<Value>()["message"].is_string());
        }
    }

    #[tokio::test]
    async fn categories_require_log_in() {
        let server = get_test_server(get_test_app_state());

        server
            .get(endpoints::CATEGORIES)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "name": "Food", "kind": "expense" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .delete(&format_endpoint(endpoints::CATEGORY, 1))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn delete_category_succeeds() {
        let state = get_test_app_state();
        let server = get_test_server(state.clone());
        let (_, cookie) = logged_in_user(&server, &state, "alice@example.com").await;
        let category = server
            .post(endpoints::CATEGORIES)
            .add_cookie(cookie.clone())
            .json(&json!({ "name": "Food", "kind": "expense" }))
            .await
            .json::<Value>();
        let category_id = category["id"].as_i64().unwrap();

        server
            .delete(&format_endpoint(endpoints::CATEGORY, category_id))
            .add_cookie(cookie.clone())
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let categories = server
            .get(endpoints::CATEGORIES)
            .add_cookie(cookie)
            .await
            .json::<Value>();
        assert_eq!(categories, json!([]));
    }

    #[tokio::test]
    async fn delete_category_of_other_user_is_not_found() {
        let state = get_test_app_state();
        let server = get_test_server(state.clone());
        let (_, alice) = logged_in_user(&server, &state, "alice@example.com").await;
        let (_, bob) = logged_in_user(&server, &state, "bob@example.com").await;
        let category = server
            .post(endpoints::CATEGORIES)
            .add_cookie(alice.clone())
            .json(&json!({ "name": "Food", "kind": "expense" }))
            .await
            .json::<Value>();
        let category_id = category["id"].as_i64().unwrap();

        let response = server
            .delete(&format_endpoint(endpoints::CATEGORY, category_id))
            .add_cookie(bob)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let categories = server
            .get(endpoints::CATEGORIES)
            .add_cookie(alice)
            .await
            .json::<Value>();
        assert_eq!(categories.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_category_with_invalid_id_is_bad_request() {
        let state = get_test_app_state();
        let server = get_test_server(state.clone());
        let (_, cookie) = logged_in_user(&server, &state, "alice@example.com").await;

        server
            .delete("/api/categories/not-a-number")
            .add_cookie(cookie)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
