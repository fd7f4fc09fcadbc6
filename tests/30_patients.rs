mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn registration(cpf: &str) -> Value {
    json!({
        "nome": format!("Paciente {}", cpf),
        "email": format!("paciente.{}@example.com", cpf),
        "telefone": "21999990000",
        "cpf": cpf
    })
}

/// Walk the cpf-sorted listing until the record shows up or pages run out
async fn find_by_cpf(client: &reqwest::Client, base_url: &str, cpf: &str) -> Result<Option<Value>> {
    for page in 0..50 {
        let res = client
            .get(format!("{}/pacientes?page={}&size=100&sort=cpf", base_url, page))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK, "listing failed on page {}", page);

        let body = res.json::<Value>().await?;
        let content = body["content"].as_array().cloned().unwrap_or_default();
        if content.is_empty() {
            break;
        }
        if let Some(hit) = content.iter().find(|p| p["cpf"] == cpf) {
            return Ok(Some(hit.clone()));
        }
    }
    Ok(None)
}

async fn register_patient(client: &reqwest::Client, base_url: &str, cpf: &str) -> Result<String> {
    let res = client
        .post(format!("{}/pacientes", base_url))
        .json(&registration(cpf))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT, "registration failed");

    let listed = find_by_cpf(client, base_url, cpf)
        .await?
        .expect("registered patient missing from listing");
    Ok(listed["id"].as_str().expect("listing entry has no id").to_string())
}

#[tokio::test]
async fn listing_projects_summary_fields_only() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let cpf = common::unique_digits(11);

    register_patient(&client, &server.base_url, &cpf).await?;

    let listed = find_by_cpf(&client, &server.base_url, &cpf).await?.unwrap();
    assert_eq!(listed["nome"], format!("Paciente {}", cpf));
    assert!(listed.get("email").is_some());
    // the listing projection drops the phone
    assert!(listed.get("telefone").is_none());

    Ok(())
}

#[tokio::test]
async fn registration_rejects_malformed_cpf() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let mut payload = registration("123");
    payload["cpf"] = json!("123");
    let res = client
        .post(format!("{}/pacientes", server.base_url))
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["field_errors"]["cpf"], "must be 11 digits");

    Ok(())
}

#[tokio::test]
async fn update_changes_only_present_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let cpf = common::unique_digits(11);
    let id = register_patient(&client, &server.base_url, &cpf).await?;

    let res = client
        .put(format!("{}/pacientes", server.base_url))
        .json(&json!({ "id": id, "telefone": "2133334444" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let detail = client
        .get(format!("{}/pacientes/{}", server.base_url, id))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(detail["telefone"], "2133334444");
    assert_eq!(detail["nome"], format!("Paciente {}", cpf));
    assert_eq!(detail["cpf"], cpf);

    Ok(())
}

#[tokio::test]
async fn delete_is_idempotent() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let cpf = common::unique_digits(11);
    let id = register_patient(&client, &server.base_url, &cpf).await?;

    for _ in 0..2 {
        let res = client
            .delete(format!("{}/pacientes/{}", server.base_url, id))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    assert!(find_by_cpf(&client, &server.base_url, &cpf).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn deleting_a_missing_id_is_404() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .delete(format!(
            "{}/pacientes/00000000-0000-4000-8000-000000000002",
            server.base_url
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
