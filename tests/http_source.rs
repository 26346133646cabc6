//! `HttpOpsSource` against a throwaway local backend.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use opsboard::api::{HttpOpsSource, OpsSource};
use opsboard::config::Config;
use opsboard::dates::DateRange;
use opsboard::error::RequestError;
use opsboard::model::{OpKind, Status};
use opsboard::query::FilterForm;

/// Serve one canned response, then report the request line.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = match listener.accept() {
            Ok(conn) => conn,
            Err(_) => return,
        };
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        // Drain headers so the client sees a clean close.
        let mut header = String::new();
        while reader.read_line(&mut header).map(|n| n > 0).unwrap_or(false) {
            if header == "\r\n" {
                break;
            }
            header.clear();
        }

        let response = format!(
            "HTTP/1.1 {}\r\n\
             Content-Type: application/json\r\n\
             Connection: close\r\n\
             Content-Length: {}\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = tx.send(request_line.trim_end().to_string());
    });

    (format!("http://{}", addr), rx)
}

fn source(base: &str) -> HttpOpsSource {
    HttpOpsSource::new(&Config::default().with_api_base(base))
}

#[tokio::test]
async fn fetches_and_decodes_ops() {
    let (base, requests) = serve_once(
        "200 OK",
        r#"{"ops":[{"STATUS":"✅ Registrando","CODIGO_OP":"OP-9","ID_PRODUTO":31,
                    "QTD_PREVISTA":"8","QTD_REGISTRADA":2,"TIPO_OP":"LIN_PROD"}]}"#,
    );
    let mut form = FilterForm::new(DateRange::new("01/03/2024", "10/03/2024"));
    form.sub_species = "PERNIL".into();
    let query = form.build().unwrap();

    let ops = source(&base).fetch_ops(&query).await.unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].status, Status::Registering);
    assert_eq!(ops[0].product_id, "31");
    assert_eq!(ops[0].planned_qty, 8.0);
    assert_eq!(ops[0].kind, OpKind::Line);

    let line = requests.recv().unwrap();
    assert_eq!(
        line,
        "GET /api/ops?data_inicio=01%2F03%2F2024&data_fim=10%2F03%2F2024\
         &subespecie=PERNIL&id_produto=&cod_op=&tipo_op=ambos HTTP/1.1"
    );
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let (base, _requests) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#);
    let query = FilterForm::new(DateRange::new("01/03/2024", "10/03/2024")).build().unwrap();

    let err = source(&base).fetch_ops(&query).await.unwrap_err();
    assert_eq!(
        err,
        RequestError::Status { status: 500, status_text: "Internal Server Error".into() }
    );
    assert_eq!(err.to_string(), "Erro 500: Internal Server Error");
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let (base, _requests) = serve_once("200 OK", r#"{"rows":[]}"#);
    let query = FilterForm::new(DateRange::new("01/03/2024", "10/03/2024")).build().unwrap();

    let err = source(&base).fetch_ops(&query).await.unwrap_err();
    assert!(matches!(err, RequestError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let query = FilterForm::new(DateRange::new("01/03/2024", "10/03/2024")).build().unwrap();

    let err = source(&format!("http://127.0.0.1:{}", port)).fetch_ops(&query).await.unwrap_err();
    assert!(matches!(err, RequestError::Transport(_)), "got {:?}", err);
}

#[tokio::test]
async fn fetches_subspecies_for_range() {
    let (base, requests) = serve_once("200 OK", r#"{"subespecies":["PERNIL","LOMBO"]}"#);
    let range = DateRange::new("01/03/2024", "10/03/2024");

    let options = source(&base).fetch_subspecies(&range).await.unwrap();
    assert_eq!(options, ["PERNIL", "LOMBO"]);
    assert_eq!(
        requests.recv().unwrap(),
        "GET /api/filtros?data_inicio=01%2F03%2F2024&data_fim=10%2F03%2F2024 HTTP/1.1"
    );
}
