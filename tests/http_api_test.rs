mod common;

use checkout_gateway::domain::call_result::ErrorStatus;
use checkout_gateway::domain::checkout::PaymentsDetailsRequest;
use checkout_gateway::domain::ports::{CheckoutApi, CheckoutClient};
use checkout_gateway::error::GatewayError;
use checkout_gateway::infrastructure::api_client::CheckoutApiClient;
use checkout_gateway::infrastructure::http::HttpCheckoutApi;
use common::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves a single canned HTTP response and hands back the raw request.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/v68", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (base_url, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn details_request() -> PaymentsDetailsRequest {
    PaymentsDetailsRequest {
        payment_data: PAYMENT_DATA.to_string(),
        details: Default::default(),
    }
}

#[tokio::test]
async fn test_successful_details_call() {
    let body = r#"{"resultCode":"Authorised","pspReference":"8815329842815468"}"#;
    let (base_url, server) = serve_once("200 OK", body).await;
    let api = HttpCheckoutApi::new("secret-key", base_url, None).unwrap();

    let response = api.payments_details(&details_request()).await.unwrap();
    assert_eq!(response.result_code.as_deref(), Some("Authorised"));
    assert_eq!(response.psp_reference.as_deref(), Some(PSP_REFERENCE));

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v68/payments/details "));
    assert!(request.to_ascii_lowercase().contains("x-api-key: secret-key"));
    assert!(request.contains(PAYMENT_DATA));
}

#[tokio::test]
async fn test_rejected_request_maps_to_api_fault() {
    let body = r#"{"status":422,"errorCode":"14_030","message":"Invalid payload","errorType":"validation","pspReference":"ABCDE6789FG"}"#;
    let (base_url, server) = serve_once("422 Unprocessable Entity", body).await;
    let client = CheckoutApiClient::new(Box::new(
        HttpCheckoutApi::new("secret-key", base_url, None).unwrap(),
    ));

    let result = client.payment_details(&details_request()).await;
    server.await.unwrap();

    assert_eq!(
        result.error_status(),
        Some(ErrorStatus::ResponseIndicatesInvalidRequest)
    );
    let checkout_gateway::domain::call_result::CallResult::Failed(failed) = result else {
        panic!("expected a failed call");
    };
    let api_error = failed.fault.api_error().unwrap();
    assert_eq!(api_error.message.as_deref(), Some("Invalid payload"));
    assert_eq!(api_error.psp_reference.as_deref(), Some("ABCDE6789FG"));
    assert!(matches!(failed.fault, GatewayError::Api(ref e) if e.status_code == 422));
}

#[tokio::test]
async fn test_garbage_body_maps_to_decode_fault() {
    let (base_url, server) = serve_once("200 OK", "not json").await;
    let api = HttpCheckoutApi::new("secret-key", base_url, None).unwrap();

    let err = api.payments_details(&details_request()).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_gateway_is_request_not_sent() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/v68", listener.local_addr().unwrap());
    drop(listener);

    let client = CheckoutApiClient::new(Box::new(
        HttpCheckoutApi::new("secret-key", base_url, None).unwrap(),
    ));
    let result = client.payment_details(&details_request()).await;

    assert_eq!(result.error_status(), Some(ErrorStatus::RequestNotSent));
    assert!(result.exception_message().is_some());
}
