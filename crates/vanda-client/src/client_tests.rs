// SPDX-License-Identifier: GPL-3.0-or-later

#[cfg(test)]
mod tests {
    use crate::{
        ImageOptions, PromptModeSelector, SearchMode, SearchRequest, VandaClient, VandaError,
        CLUSTER_FACETS,
    };
    use std::io::Cursor;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn object_record(n: usize) -> serde_json::Value {
        serde_json::json!({
            "systemNumber": format!("O{}", 163500 + n),
            "accessionNumber": format!("C.{}-1985", n),
            "objectType": "Cup and saucer",
            "_primaryTitle": "Tulip",
            "_primaryMaker": { "name": "Paragon China Limited", "association": "maker" },
            "_primaryImageId": format!("2010EH{:04}", n),
            "_primaryDate": "1931",
            "_primaryPlace": "Longton"
        })
    }

    fn search_response(
        records: Vec<serde_json::Value>,
        record_count: u64,
        pages: u64,
    ) -> serde_json::Value {
        serde_json::json!({
            "info": {
                "version": "2.0",
                "record_count": record_count,
                "record_count_exact": true,
                "parameters": {},
                "page_size": records.len(),
                "pages": pages,
                "page": 1
            },
            "records": records
        })
    }

    fn china_response() -> serde_json::Value {
        search_response(
            vec![
                object_record(44),
                serde_json::json!({
                    "systemNumber": "O163543",
                    "objectType": "Coffee pot and cover",
                    "_primaryTitle": "Tulip",
                    "_primaryMaker": { "name": "Paragon China Limited", "association": "maker" },
                    "_primaryImageId": null,
                    "_primaryDate": "1931",
                    "_primaryPlace": "Longton"
                }),
                serde_json::json!({
                    "systemNumber": "O12345",
                    "objectType": "Vase",
                    "_primaryTitle": "",
                    "_primaryMaker": {},
                    "_primaryImageId": "2006AE7822",
                    "_primaryDate": "45",
                    "_primaryPlace": "Rome"
                }),
            ],
            25450,
            2545,
        )
    }

    fn empty_response() -> serde_json::Value {
        search_response(Vec::new(), 0, 0)
    }

    /// Clusters body with facets in service order; `empty` facets get no terms.
    /// Built as text because `json!` objects sort their keys.
    fn cluster_body(empty: &[&str]) -> String {
        let clusters: Vec<String> = CLUSTER_FACETS
            .iter()
            .map(|facet| {
                let terms = if empty.contains(facet) {
                    serde_json::json!([])
                } else {
                    serde_json::json!([
                        { "value": format!("top {}", facet), "value_id": "x", "count": 50 },
                        { "value": format!("second {}", facet), "value_id": "y", "count": 20 }
                    ])
                };
                format!(
                    r#""{}": {{"other_terms_record_count": 100, "terms": {}}}"#,
                    facet, terms
                )
            })
            .collect();

        format!(
            r#"{{"info": {{"version": "2.0", "record_count": 75409}}, "clusters": {{{}}}}}"#,
            clusters.join(", ")
        )
    }

    fn client_for(mock_server: &MockServer) -> VandaClient {
        VandaClient::builder()
            .base_url(mock_server.uri())
            .image_base_url("https://framemark.vam.ac.uk/collections")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_search_general() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .and(query_param("q", "China"))
            .and(query_param("page_size", "10"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(china_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let response = client
            .search(&SearchRequest::new("China"), SearchMode::General)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.record_count, 25450);
        assert_eq!(response.page_count, 2545);
        assert_eq!(response.records.len(), 3);

        let first = &response.records[0];
        assert_eq!(first.object_type, "Cup and saucer");
        assert_eq!(first.title.as_deref(), Some("Tulip"));
        assert_eq!(first.maker.as_deref(), Some("Paragon China Limited"));
        assert_eq!(first.association.as_deref(), Some("maker"));
        assert_eq!(first.primary_location, "Longton");
        assert_eq!(first.system_number, "O163544");
    }

    #[tokio::test]
    async fn test_search_honours_page_size() {
        let mock_server = MockServer::start().await;

        let records = (0..87).map(object_record).collect();
        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .and(query_param("q", "hello"))
            .and(query_param("page_size", "87"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(search_response(records, 1203, 14)),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let request = SearchRequest::new("hello").page_size(87);
        let response = client.search(&request, "1").await.unwrap().unwrap();

        assert_eq!(response.records.len(), 87);
    }

    #[tokio::test]
    async fn test_search_constrained_modes() {
        let cases = [
            ("two", "q_object_type"),
            ("THREE", "q_material_technique"),
            ("5", "q_object_title"),
        ];

        for (token, param) in cases {
            let mock_server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/objects/search"))
                .and(query_param(param, "silver"))
                .and(query_param("page_size", "25"))
                .and(query_param("page", "3"))
                .and(query_param_is_missing("q"))
                .respond_with(ResponseTemplate::new(200).set_body_json(china_response()))
                .expect(1)
                .mount(&mock_server)
                .await;

            let client = client_for(&mock_server);
            let request = SearchRequest::new("silver").page(3).page_size(25);
            let response = client.search(&request, token).await.unwrap();
            assert!(response.is_some(), "{token}");
        }
    }

    #[tokio::test]
    async fn test_actor_search_omits_pagination() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .and(query_param("q_actor", "Da Vinci"))
            .and(query_param_is_missing("page"))
            .and(query_param_is_missing("page_size"))
            .respond_with(ResponseTemplate::new(200).set_body_json(china_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let request = SearchRequest::new("Da Vinci").page(2).page_size(50);
        let response = client.search(&request, SearchMode::Actor).await.unwrap();

        assert!(response.is_some());
    }

    #[tokio::test]
    async fn test_invalid_mode_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(china_response()))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        for token in ["6", "six", "", "general"] {
            let result = client.search(&SearchRequest::new("China"), token).await;
            assert!(matches!(result, Err(VandaError::InvalidInput(_))), "{token:?}");
        }
    }

    #[tokio::test]
    async fn test_search_with_prompted_mode() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .and(query_param("q_object_type", "painting"))
            .respond_with(ResponseTemplate::new(200).set_body_json(china_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let mut prompt = PromptModeSelector::new(Cursor::new("Two\n"), Vec::new());
        let response = client
            .search(&SearchRequest::new("painting"), &mut prompt)
            .await
            .unwrap();

        assert!(response.is_some());
    }

    #[tokio::test]
    async fn test_search_no_results() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_response()))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let response = client
            .search(&SearchRequest::new("zzzzqqqq"), SearchMode::General)
            .await
            .unwrap();

        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client
            .search(&SearchRequest::new("China"), SearchMode::General)
            .await;

        match result {
            Err(VandaError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client
            .search(&SearchRequest::new("China"), SearchMode::General)
            .await;

        assert!(matches!(result, Err(VandaError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on port 1.
        let client = VandaClient::builder()
            .base_url("http://127.0.0.1:1")
            .build()
            .unwrap();

        let result = client
            .search(&SearchRequest::new("China"), SearchMode::General)
            .await;
        assert!(matches!(result, Err(VandaError::Transport(_))), "{result:?}");

        let result = client.cluster_summary("Italy").await;
        assert!(matches!(result, Err(VandaError::Transport(_))), "{result:?}");
    }

    #[tokio::test]
    async fn test_malformed_base_url_is_config_error() {
        let client = VandaClient::builder()
            .base_url("not a url")
            .build()
            .unwrap();

        let result = client
            .search(&SearchRequest::new("China"), SearchMode::General)
            .await;
        assert!(matches!(result, Err(VandaError::Config(_))), "{result:?}");

        let result = client.cluster_summary("Italy").await;
        assert!(matches!(result, Err(VandaError::Config(_))), "{result:?}");
    }

    #[tokio::test]
    async fn test_page_summary() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .and(query_param("q", "China"))
            .respond_with(ResponseTemplate::new(200).set_body_json(china_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let summary = client
            .page_summary(&SearchRequest::new("China"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(summary.num_works, 2);
        assert_eq!(summary.num_unique_makers, 2);
        assert_eq!(summary.most_common_location.as_deref(), Some("Longton"));
        assert_eq!(summary.centuries, vec![1, 20]);
        assert_eq!(
            summary.distinct_types,
            vec!["Cup and saucer", "Coffee pot and cover", "Vase"]
        );
    }

    #[tokio::test]
    async fn test_page_summary_no_results() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_response()))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let summary = client
            .page_summary(&SearchRequest::new("zzzzqqqq"))
            .await
            .unwrap();

        assert!(summary.is_none());
    }

    #[tokio::test]
    async fn test_image_urls() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .and(query_param("q", "Barbie"))
            .and(query_param("page", "2"))
            .and(query_param("page_size", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(china_response()))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let request = SearchRequest::new("Barbie").page(2).page_size(100);
        let urls = client
            .image_urls(&request, SearchMode::General, &ImageOptions::default())
            .await
            .unwrap();

        assert_eq!(
            urls,
            vec![
                "https://framemark.vam.ac.uk/collections/2010EH0044/full/full/0/default.jpg",
                "https://framemark.vam.ac.uk/collections/2006AE7822/full/full/0/default.jpg",
            ]
        );
    }

    #[tokio::test]
    async fn test_image_urls_with_options() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response(
                vec![object_record(7)],
                1,
                1,
            )))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let options = ImageOptions::default().size("!500,500").quality("gray");
        let urls = client
            .image_urls(&SearchRequest::new("Barbie"), SearchMode::Title, &options)
            .await
            .unwrap();

        assert_eq!(
            urls,
            vec!["https://framemark.vam.ac.uk/collections/2010EH0007/full/!500,500/0/gray.jpg"]
        );
    }

    #[tokio::test]
    async fn test_image_urls_no_results() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_response()))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let urls = client
            .image_urls(
                &SearchRequest::new("zzzzqqqq"),
                SearchMode::General,
                &ImageOptions::default(),
            )
            .await
            .unwrap();

        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn test_image_urls_without_image_ids() {
        let mock_server = MockServer::start().await;

        let mut record = object_record(1);
        record["_primaryImageId"] = serde_json::Value::Null;
        Mock::given(method("GET"))
            .and(path("/objects/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(search_response(vec![record], 1, 1)),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let urls = client
            .image_urls(
                &SearchRequest::new("Tulip"),
                SearchMode::General,
                &ImageOptions::default(),
            )
            .await
            .unwrap();

        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn test_cluster_summary() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/clusters/search"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_string(cluster_body(&[])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let summary = client.cluster_summary("Paris").await.unwrap();

        assert_eq!(summary.record_count, 75409);
        assert!(summary.skipped.is_empty());

        assert_eq!(summary.facets().collect::<Vec<_>>(), CLUSTER_FACETS.to_vec());

        for (facet, value) in &summary.top_terms {
            assert_eq!(value, &format!("top {}", facet));
        }
    }

    #[tokio::test]
    async fn test_cluster_summary_skips_empty_facet() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/clusters/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(cluster_body(&["style"])))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let summary = client.cluster_summary("Italy").await.unwrap();

        assert_eq!(summary.top_terms.len(), CLUSTER_FACETS.len() - 1);
        assert_eq!(summary.get("style"), None);
        assert_eq!(summary.get("depicts"), Some("top depicts"));
        assert_eq!(summary.skipped, vec!["style"]);
    }

    #[tokio::test]
    async fn test_cluster_summary_without_info() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/objects/clusters/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "detail": "no query" })),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.cluster_summary("Italy").await;

        assert!(matches!(result, Err(VandaError::MissingQuery)));
    }

    #[tokio::test]
    async fn test_cluster_summary_blank_query_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(cluster_body(&[])))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.cluster_summary("   ").await;

        assert!(matches!(result, Err(VandaError::MissingQuery)));
    }
}
