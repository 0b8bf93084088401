use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use loanscore_core::{Error, SchemaVariant};
use loanscore_schema::{
    DecisionRule, DeploymentSet, ExplainedVector, FeatureEncoder, FeatureSchema, RawForm,
    SchemaDescription, Verdict,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Serialize)]
struct DeploymentInfo {
    variant: SchemaVariant,
    name: String,
    dim: usize,
    rule: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold: Option<f64>,
}

#[derive(Deserialize)]
struct PredictQuery {
    #[serde(default)]
    explain: bool,
}

#[derive(Serialize)]
struct EncodeResponse {
    variant: SchemaVariant,
    dim: usize,
    vector: Vec<f64>,
    slots: ExplainedVector,
}

#[derive(Serialize)]
struct PredictResponse {
    request_id: String,
    variant: SchemaVariant,
    deployment: String,
    verdict: Verdict,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explain: Option<ExplainedVector>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(deployments: Arc<DeploymentSet>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(deployments.clone()))
                .configure(Self::configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Register every route; shared by the server and tests
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.route("/healthz", web::get().to(health))
            .route("/schemas", web::get().to(list_schemas))
            .route("/schemas/{variant}", web::get().to(get_schema))
            .route("/schemas/{variant}/encode", web::post().to(encode_form))
            .route("/schemas/{variant}/predict", web::post().to(predict));
    }
}

fn error_response(err: &Error) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        Error::UnknownVariant(_) | Error::DeploymentNotLoaded(_) => {
            HttpResponse::NotFound().json(body)
        }
        Error::InvalidInput { .. } | Error::Serialization(_) => {
            HttpResponse::BadRequest().json(body)
        }
        _ => HttpResponse::InternalServerError().json(body),
    }
}

/// Parse the body as a form and apply the collector's numeric lower bound
fn collect_form(schema: &FeatureSchema, body: serde_json::Value) -> Result<RawForm, Error> {
    let form = RawForm::from_json(body)?;
    schema.check_bounds(&form)?;
    Ok(form)
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

async fn list_schemas(deployments: web::Data<Arc<DeploymentSet>>) -> ActixResult<HttpResponse> {
    let infos: Vec<DeploymentInfo> = deployments
        .iter()
        .map(|d| {
            let (rule, threshold) = match d.rule() {
                DecisionRule::ClassLabel => ("class_label", None),
                DecisionRule::ProbabilityThreshold(t) => ("probability_threshold", Some(t)),
            };
            DeploymentInfo {
                variant: d.variant(),
                name: d.name().to_string(),
                dim: d.schema().dim(),
                rule,
                threshold,
            }
        })
        .collect();
    Ok(HttpResponse::Ok().json(infos))
}

async fn get_schema(path: web::Path<String>) -> ActixResult<HttpResponse> {
    let variant = match path.into_inner().parse::<SchemaVariant>() {
        Ok(v) => v,
        Err(e) => return Ok(error_response(&e)),
    };
    let schema = FeatureSchema::for_variant(variant);
    Ok(HttpResponse::Ok().json(SchemaDescription::from_schema(&schema)))
}

async fn encode_form(
    path: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    let variant = match path.into_inner().parse::<SchemaVariant>() {
        Ok(v) => v,
        Err(e) => return Ok(error_response(&e)),
    };
    let encoder = FeatureEncoder::new(FeatureSchema::for_variant(variant));

    let form = match collect_form(encoder.schema(), body.into_inner()) {
        Ok(form) => form,
        Err(e) => return Ok(error_response(&e)),
    };

    let slots = encoder.explain(&form);
    Ok(HttpResponse::Ok().json(EncodeResponse {
        variant,
        dim: encoder.vector_dim(),
        vector: slots.values(),
        slots,
    }))
}

async fn predict(
    deployments: web::Data<Arc<DeploymentSet>>,
    path: web::Path<String>,
    query: web::Query<PredictQuery>,
    body: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    let request_id = Uuid::new_v4().to_string();

    let deployment = match path
        .into_inner()
        .parse::<SchemaVariant>()
        .and_then(|variant| deployments.get(variant).cloned())
    {
        Ok(d) => d,
        Err(e) => return Ok(error_response(&e)),
    };

    let form = match collect_form(deployment.schema(), body.into_inner()) {
        Ok(form) => form,
        Err(e) => {
            debug!(request_id = %request_id, error = %e, "form rejected");
            return Ok(error_response(&e));
        }
    };

    let prediction = match deployment.predict(&form) {
        Ok(p) => p,
        Err(e) => {
            warn!(request_id = %request_id, deployment = deployment.name(), error = %e, "prediction failed");
            return Ok(error_response(&e));
        }
    };

    let explain = query.explain.then(|| {
        ExplainedVector::new(&deployment.schema().slot_names(), &prediction.vector)
    });

    debug!(request_id = %request_id, verdict = %prediction.verdict, "request served");

    Ok(HttpResponse::Ok().json(PredictResponse {
        request_id,
        variant: prediction.variant,
        deployment: deployment.name().to_string(),
        verdict: prediction.verdict,
        message: prediction.message,
        probability: prediction.probability,
        explain,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use loanscore_core::{Classifier, FeatureMatrix, Result};
    use loanscore_schema::Deployment;
    use serde_json::{json, Value};

    /// Default when the first slot exceeds `cutoff`, with p1 = first slot / 1e6
    struct IncomeRule {
        cutoff: f64,
    }

    impl Classifier for IncomeRule {
        fn predict(&self, x: &FeatureMatrix) -> Result<Vec<u8>> {
            Ok(x.iter_rows().map(|r| u8::from(r[0] > self.cutoff)).collect())
        }

        fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<[f64; 2]>> {
            Ok(x
                .iter_rows()
                .map(|r| {
                    let p1 = (r[0] / 1e6).clamp(0.0, 1.0);
                    [1.0 - p1, p1]
                })
                .collect())
        }
    }

    fn deployments() -> Arc<DeploymentSet> {
        let classifier: Arc<dyn Classifier> = Arc::new(IncomeRule { cutoff: 100000.0 });
        Arc::new(
            DeploymentSet::new()
                .with(Deployment::new(SchemaVariant::A, classifier.clone()).unwrap())
                .with(Deployment::new(SchemaVariant::B, classifier).unwrap()),
        )
    }

    macro_rules! app {
        ($set:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($set))
                    .configure(RestApi::configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health() {
        let app = app!(deployments());
        let req = test::TestRequest::get().uri("/healthz").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_list_schemas() {
        let app = app!(deployments());
        let req = test::TestRequest::get().uri("/schemas").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["variant"], "a");
        assert_eq!(body[0]["dim"], 27);
        assert_eq!(body[0]["rule"], "class_label");
        assert_eq!(body[1]["variant"], "b");
        assert_eq!(body[1]["threshold"], 0.05);
    }

    #[actix_web::test]
    async fn test_describe_schema() {
        let app = app!(deployments());
        let req = test::TestRequest::get().uri("/schemas/b").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["dim"], 20);

        let req = test::TestRequest::get().uri("/schemas/z").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_encode_blank_schema_b() {
        let app = app!(deployments());
        let req = test::TestRequest::post()
            .uri("/schemas/b/encode")
            .set_json(json!({ "Client_Income": 30000, "Client_Gender": "" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["dim"], 20);
        assert_eq!(body["vector"][0], 30000.0);
        assert_eq!(body["vector"][14], -1.0);
        assert_eq!(body["slots"]["slots"][14]["name"], "Gender_Code");
    }

    #[actix_web::test]
    async fn test_encode_unsupported_shape_uses_sentinel() {
        let app = app!(deployments());
        let req = test::TestRequest::post()
            .uri("/schemas/b/encode")
            .set_json(json!({ "Client_Gender": ["Male"], "Client_Income": 1000 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["vector"][0], 1000.0);
        assert_eq!(body["vector"][14], -1.0);
    }

    #[actix_web::test]
    async fn test_predict_schema_a_label() {
        let app = app!(deployments());
        let req = test::TestRequest::post()
            .uri("/schemas/a/predict?explain=true")
            .set_json(json!({
                "Client_Income": 250000,
                "Client_Gender": "Male",
                "Loan_Contract_Type": "RL"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["verdict"], "DEFAULT");
        assert!(body.get("probability").is_none());
        assert_eq!(body["explain"]["slots"].as_array().unwrap().len(), 27);
        assert_eq!(body["explain"]["slots"][24]["value"], 1.0);
    }

    #[actix_web::test]
    async fn test_predict_schema_b_threshold() {
        let app = app!(deployments());
        // p1 = 50000 / 1e6 = 0.05 sits exactly on the cutoff
        let req = test::TestRequest::post()
            .uri("/schemas/b/predict")
            .set_json(json!({ "Client_Income": 50000 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["verdict"], "DEFAULT");
        assert_eq!(body["probability"], 0.05);
        assert!(body.get("explain").is_none());

        let req = test::TestRequest::post()
            .uri("/schemas/b/predict")
            .set_json(json!({ "Client_Income": 49999 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["verdict"], "NO_DEFAULT");
        assert_eq!(body["message"], "The client is predicted to NOT default on the loan.");
    }

    #[actix_web::test]
    async fn test_negative_number_rejected() {
        let app = app!(deployments());
        let req = test::TestRequest::post()
            .uri("/schemas/a/predict")
            .set_json(json!({ "Credit_Amount": -1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_non_object_body_rejected() {
        let app = app!(deployments());
        let req = test::TestRequest::post()
            .uri("/schemas/a/encode")
            .set_json(json!([1, 2, 3]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unloaded_deployment() {
        let only_b = Arc::new(DeploymentSet::new().with(
            Deployment::new(SchemaVariant::B, Arc::new(IncomeRule { cutoff: 0.0 })).unwrap(),
        ));
        let app = app!(only_b);
        let req = test::TestRequest::post()
            .uri("/schemas/a/predict")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
