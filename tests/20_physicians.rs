mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn registration(crm: &str) -> Value {
    json!({
        "nome": format!("Medico {}", crm),
        "email": format!("medico.{}@voll.med", crm),
        "telefone": "11987654321",
        "crm": crm,
        "especialidade": "cardiologia",
        "endereco": {
            "logradouro": "Rua das Flores",
            "bairro": "Centro",
            "CEP": "01310000",
            "cidade": "São Paulo",
            "UF": "SP",
            "numero": "120"
        }
    })
}

/// Walk the crm-sorted listing until the record shows up or pages run out
async fn find_by_crm(client: &reqwest::Client, base_url: &str, crm: &str) -> Result<Option<Value>> {
    for page in 0..50 {
        let res = client
            .get(format!("{}/medicos?page={}&size=100&sort=crm", base_url, page))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK, "listing failed on page {}", page);

        let body = res.json::<Value>().await?;
        let content = body["content"].as_array().cloned().unwrap_or_default();
        if content.is_empty() {
            break;
        }
        if let Some(hit) = content.iter().find(|m| m["crm"] == crm) {
            return Ok(Some(hit.clone()));
        }
    }
    Ok(None)
}

async fn register_physician(client: &reqwest::Client, base_url: &str, crm: &str) -> Result<String> {
    let res = client
        .post(format!("{}/medicos", base_url))
        .json(&registration(crm))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT, "registration failed");

    let listed = find_by_crm(client, base_url, crm)
        .await?
        .expect("registered physician missing from listing");
    Ok(listed["id"].as_str().expect("listing entry has no id").to_string())
}

#[tokio::test]
async fn register_then_appears_in_listing() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let crm = common::unique_digits(6);

    register_physician(&client, &server.base_url, &crm).await?;

    let listed = find_by_crm(&client, &server.base_url, &crm).await?.unwrap();
    assert_eq!(listed["especialidade"], "cardiologia");
    // listing is a projection: no phone or address
    assert!(listed.get("telefone").is_none());
    assert!(listed.get("endereco").is_none());

    Ok(())
}

#[tokio::test]
async fn registration_reports_field_errors() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/medicos", server.base_url))
        .json(&json!({ "nome": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["nome"], "must not be blank");
    assert_eq!(body["field_errors"]["crm"], "is required");
    assert_eq!(body["field_errors"]["endereco"], "is required");

    Ok(())
}

#[tokio::test]
async fn noop_update_leaves_every_field_unchanged() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let crm = common::unique_digits(6);
    let id = register_physician(&client, &server.base_url, &crm).await?;

    let res = client
        .put(format!("{}/medicos", server.base_url))
        .json(&json!({ "id": id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let detail = client
        .get(format!("{}/medicos/{}", server.base_url, id))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(detail["nome"], format!("Medico {}", crm));
    assert_eq!(detail["telefone"], "11987654321");
    assert_eq!(detail["endereco"]["logradouro"], "Rua das Flores");
    assert_eq!(detail["endereco"]["cidade"], "São Paulo");

    Ok(())
}

#[tokio::test]
async fn address_update_touches_only_supplied_field() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let crm = common::unique_digits(6);
    let id = register_physician(&client, &server.base_url, &crm).await?;

    let res = client
        .put(format!("{}/medicos", server.base_url))
        .json(&json!({ "id": id, "endereco": { "cidade": "Campinas" } }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let detail = client
        .get(format!("{}/medicos/{}", server.base_url, id))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(detail["endereco"]["cidade"], "Campinas");
    // siblings untouched
    assert_eq!(detail["endereco"]["logradouro"], "Rua das Flores");
    assert_eq!(detail["endereco"]["bairro"], "Centro");
    assert_eq!(detail["endereco"]["cep"], "01310000");

    Ok(())
}

#[tokio::test]
async fn delete_is_idempotent_and_hides_the_record() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let crm = common::unique_digits(6);
    let id = register_physician(&client, &server.base_url, &crm).await?;

    let first = client
        .delete(format!("{}/medicos/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);

    // second delete is a no-op, not an error
    let second = client
        .delete(format!("{}/medicos/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(second.status(), StatusCode::NO_CONTENT);

    // inactive records disappear from detail and listing
    let detail = client
        .get(format!("{}/medicos/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);
    assert!(find_by_crm(&client, &server.base_url, &crm).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn mutating_a_missing_id_is_404() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let missing = "00000000-0000-4000-8000-000000000001";

    let res = client
        .delete(format!("{}/medicos/{}", server.base_url, missing))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(format!("{}/medicos", server.base_url))
        .json(&json!({ "id": missing, "nome": "Outro Nome" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn malformed_body_answers_with_the_error_envelope() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/medicos", server.base_url))
        .header("content-type", "application/json")
        .body("{\"nome\":")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "INVALID_JSON");

    Ok(())
}

#[tokio::test]
async fn unsupported_sort_key_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/medicos?sort=telefone", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
