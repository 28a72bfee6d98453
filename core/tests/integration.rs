//! Full variant lifecycle test against the live mock server.
//!
//! # Design
//! Seeds the mock server with one app, starts it on a random port, then
//! exercises every client operation over real HTTP using ureq: listing,
//! schema-driven parameter discovery, generation, saving a derived variant,
//! the datasets loader, the evaluation sub-resource, and both removals.
//! Validates that request building and response parsing work end-to-end
//! against the actual server.

use variant_core::{
    ApiError, DatasetsLoader, EvaluationClient, HttpMethod, HttpResponse, Parameter, Variant,
    VariantClient,
};

/// Execute an `HttpRequest` over real HTTP with ureq.
///
/// ureq normally turns 4xx/5xx into `Err`; that is disabled here so every
/// status lands in the `HttpResponse` and the client's own status handling
/// is what gets exercised.
fn execute(req: variant_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, Some(body)) => agent
            .delete(&req.path)
            .force_send_body()
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Delete, None) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            agent.put(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

#[test]
fn variant_lifecycle() {
    let _ = env_logger::builder().is_test(true).try_init();

    // Step 1: seed one app with an original variant and a dataset, then
    // start the mock server on a random port.
    let db = mock_server::ServerState::default()
        .with_app(
            "sandbox",
            vec![mock_server::StoredVariant {
                variant_name: "v1".to_string(),
                previous_variant_name: None,
                parameters: vec![
                    mock_server::ParameterSpec {
                        name: "prompt".to_string(),
                        default: None,
                        input: true,
                    },
                    mock_server::ParameterSpec {
                        name: "temperature".to_string(),
                        default: Some("0.7".to_string()),
                        input: false,
                    },
                ],
            }],
        )
        .with_datasets("sandbox", &["golden-set"])
        .into_db();

    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_state(listener, db).await
        })
        .unwrap();
    });

    let base = format!("http://{addr}");
    let client = VariantClient::new(&base);
    let evals = EvaluationClient::new(&base);

    // Step 2: list — the seeded variant comes back persistent.
    let req = client.build_list_variants("sandbox");
    let variants = client.parse_list_variants(execute(req)).unwrap();
    assert_eq!(variants.len(), 1);
    let v1 = variants[0].clone();
    assert_eq!(v1.variant_name, "v1");
    assert!(v1.persistent);
    assert!(v1.template_variant_name.is_none());

    // Step 3: discover parameters through the variant's OpenAPI document.
    let req = client.build_variant_schema("sandbox", &v1);
    let split = client.parse_variant_parameters(execute(req)).unwrap();
    assert_eq!(split.input_params.len(), 1);
    assert_eq!(split.input_params[0].name, "prompt");
    assert_eq!(split.init_opt_params.len(), 1);
    assert_eq!(split.init_opt_params[0].default.as_deref(), Some("0.7"));

    // Step 4: invoke generation with one input and the discovered options.
    let inputs = vec![("prompt".to_string(), "hello world".to_string())];
    let req = client.build_call_variant(&inputs, &split.init_opt_params, "sandbox/v1");
    let payload = client.parse_call_variant(execute(req)).unwrap();
    assert_eq!(payload["params"]["prompt"], "hello world");
    assert_eq!(payload["params"]["temperature"], "0.7");

    // Step 5: save a derived variant, then list both.
    let v2 = Variant {
        variant_name: "v2".to_string(),
        template_variant_name: Some("v1".to_string()),
        persistent: false,
        parameters: Vec::new(),
    };
    let parameters = vec![Parameter {
        name: "temperature".to_string(),
        default: Some("0.9".to_string()),
        input: false,
    }];
    let req = client.build_save_new_variant("sandbox", &v2, &parameters).unwrap();
    client.parse_save_new_variant(&v2.variant_name, execute(req)).unwrap();

    let req = client.build_list_variants("sandbox");
    let variants = client.parse_list_variants(execute(req)).unwrap();
    assert_eq!(variants.len(), 2);
    let saved = variants.iter().find(|v| v.variant_name == "v2").unwrap();
    assert_eq!(saved.template_variant_name.as_deref(), Some("v1"));
    assert!(saved.persistent);

    // Step 6: load datasets through the state machine.
    let mut loader = DatasetsLoader::new(&client, "sandbox");
    assert!(loader.is_loading());
    let response = execute(loader.request().clone());
    loader.resolve(response);
    assert!(!loader.is_loading());
    assert!(loader.error().is_none());
    let datasets = loader.datasets().unwrap();
    assert_eq!(datasets.as_array().unwrap().len(), 1);
    assert_eq!(datasets[0]["name"], "golden-set");

    // Step 7: evaluation table and rows.
    let table = serde_json::json!({"status": "running"});
    let req = evals.build_update_evaluations("table-1", &table).unwrap();
    let echoed = evals.parse_evaluations(execute(req)).unwrap();
    assert_eq!(echoed, table);

    let row = serde_json::json!({"inputs": ["hello"]});
    let req = evals.build_post_evaluation_row("table-1", &row).unwrap();
    let created = evals.parse_evaluations(execute(req)).unwrap();
    let row_id = created["id"].as_str().unwrap().to_string();

    let update = serde_json::json!({"inputs": ["hello"], "score": 1});
    let req = evals
        .build_update_evaluation_row("table-1", &row_id, &update)
        .unwrap();
    let updated = evals.parse_evaluations(execute(req)).unwrap();
    assert_eq!(updated["score"], 1);

    // Step 8: remove the derived variant.
    let req = client.build_remove_variant("sandbox", "v2").unwrap();
    client.parse_remove_variant("v2", execute(req)).unwrap();
    let req = client.build_list_variants("sandbox");
    assert_eq!(client.parse_list_variants(execute(req)).unwrap().len(), 1);

    // Step 9: remove the app; the listing drains to empty.
    let req = client.build_remove_app("sandbox").unwrap();
    client.parse_remove_app("sandbox", execute(req)).unwrap();
    let req = client.build_list_variants("sandbox");
    assert!(client.parse_list_variants(execute(req)).unwrap().is_empty());

    // Step 10: removing again surfaces the backend's 404 unchanged.
    let req = client.build_remove_app("sandbox").unwrap();
    let err = client.parse_remove_app("sandbox", execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 404, .. }));
}
