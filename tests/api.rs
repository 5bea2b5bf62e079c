mod common;

use axum::http::StatusCode;
use common::{MultipartBody, TestHarness};
use preorder_admin::sql::SqlValue;
use regex::Regex;
use serde_json::{json, Value};

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn missing_selectors_are_rejected() {
    let h = TestHarness::new();
    let (status, body) = h.get("/admin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("entity & action are required"));

    let (status, _) = h.get("/admin?entity=student").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_entity_and_action() {
    let h = TestHarness::new();
    let (status, body) = h.form("vendor", "read", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("unknown entity: vendor"));

    let (status, body) = h.form("product", "archive", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("unknown action for product: archive"));
}

#[tokio::test]
async fn selectors_can_come_from_the_body() {
    let h = TestHarness::new();
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/admin")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(axum::body::Body::from("entity=admin&action=read"))
        .unwrap();
    let (status, body) = h.send(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("admin list"));
}

#[tokio::test]
async fn student_create_then_read() {
    let h = TestHarness::new();
    let (status, body) = h
        .form("student", "create", &[("nim", "12345"), ("nama", "Budi"), ("no_telp", "0800"), ("prodi", "TI")])
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("student created"));
    assert_eq!(body["data"], json!({ "nim": "12345" }));

    let rows = h.rows("student").await;
    assert_eq!(
        rows,
        vec![json!({
            "nim": "12345",
            "nama": "Budi",
            "no_telp": "0800",
            "prodi": "TI"
        })]
    );
}

#[tokio::test]
async fn duplicate_student_is_a_server_error() {
    let h = TestHarness::new();
    h.form("student", "create", &[("nim", "1"), ("nama", "A")]).await;
    let (status, body) = h.form("student", "create", &[("nim", "1"), ("nama", "B")]).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(h.rows("student").await.len(), 1);
}

#[tokio::test]
async fn synthetic_ids_increment_per_entity() {
    let h = TestHarness::new();
    for expected in ["P001", "P002"] {
        let (status, body) = h
            .form("product", "create", &[("vendor_id", "1"), ("nama_baju", "Kaos Angkatan"), ("harga", "85000")])
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["data"]["produk_id"], json!(expected));
    }
    for expected in ["A01", "A02"] {
        let (_, body) = h
            .form("admin", "create", &[("admin_nama", "Sari"), ("admin_email", "sari@kampus.ac.id")])
            .await;
        assert_eq!(body["data"]["admin_id"], json!(expected));
    }
    for expected in ["O001", "O002"] {
        let (_, body) = h.form("preorder", "create", &[("produk_id", "P001"), ("nim", "2101001")]).await;
        assert_eq!(body["data"]["order_id"], json!(expected));
    }
}

#[tokio::test]
async fn product_defaults_price_and_stock_to_zero() {
    let h = TestHarness::new();
    h.form("product", "create", &[("vendor_id", "3"), ("nama_baju", "Hoodie")]).await;
    let rows = h.rows("product").await;
    assert_eq!(rows[0]["harga"], json!(0));
    assert_eq!(rows[0]["stok"], json!(0));
    assert_eq!(rows[0]["ukuran"], Value::Null);
}

#[tokio::test]
async fn read_on_empty_table() {
    let h = TestHarness::new();
    let (status, body) = h.form("admin", "read", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "admin list", "data": [] }));
}

#[tokio::test]
async fn read_works_over_get() {
    let h = TestHarness::new();
    h.form("student", "create", &[("nim", "9"), ("nama", "Rina")]).await;
    let (status, body) = h.get("/admin?entity=mahasiswa&action=read").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["nama"], json!("Rina"));
}

#[tokio::test]
async fn update_with_only_the_key_changes_nothing() {
    let h = TestHarness::new();
    h.form("student", "create", &[("nim", "5"), ("nama", "Dewi"), ("no_telp", "0812")]).await;
    let before = h.rows("student").await;

    let (status, body) = h.form("student", "update", &[("nim", "5"), ("nama", "  ")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("student updated"));
    assert_eq!(h.rows("student").await, before);
}

#[tokio::test]
async fn partial_update_keeps_other_columns() {
    let h = TestHarness::new();
    h.form("product", "create", &[("vendor_id", "1"), ("nama_baju", "Kemeja"), ("harga", "120000"), ("stok", "10")])
        .await;
    let (status, _) = h.form("product", "update", &[("produk_id", "P001"), ("stok", "7")]).await;
    assert_eq!(status, StatusCode::OK);

    let row = &h.rows("product").await[0];
    assert_eq!(row["stok"], json!(7));
    assert_eq!(row["harga"], json!(120000));
    assert_eq!(row["nama_baju"], json!("Kemeja"));
}

#[tokio::test]
async fn update_and_delete_of_unknown_key_succeed() {
    let h = TestHarness::new();
    let (status, body) = h.form("admin", "update", &[("admin_id", "A77"), ("admin_nama", "X")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (status, body) = h.form("student", "delete", &[("nim", "404")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("student deleted"));
}

#[tokio::test]
async fn delete_removes_the_row() {
    let h = TestHarness::new();
    h.form("admin", "create", &[("admin_nama", "Sari"), ("admin_email", "s@k.id")]).await;
    h.form("admin", "create", &[("admin_nama", "Tono"), ("admin_email", "t@k.id")]).await;
    h.form("admin", "delete", &[("admin_id", "A01")]).await;
    let rows = h.rows("admin").await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["admin_id"], json!("A02"));
}

#[tokio::test]
async fn key_is_required_for_update_and_delete() {
    let h = TestHarness::new();
    let (status, body) = h.form("product", "update", &[("stok", "1")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("missing required field: produk_id"));

    let (status, _) = h.form("invoice", "delete", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn preorder_without_nim_is_rejected_and_not_stored() {
    let h = TestHarness::new();
    let (status, body) = h.form("preorder", "create", &[("produk_id", "P001")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("missing required field: nim"));
    assert!(h.rows("preorder").await.is_empty());
}

#[tokio::test]
async fn preorder_defaults_date_and_status() {
    let h = TestHarness::new();
    h.form("preorder", "create", &[("produk_id", "P001"), ("nim", "1")]).await;
    let row = &h.rows("pre_order").await[0];
    assert_eq!(row["tanggal_order"], json!(today()));
    assert_eq!(row["status_pembayaran"], json!("Belum Bayar"));
    assert_eq!(row["admin_id"], Value::Null);
}

#[tokio::test]
async fn preorder_read_joins_names_newest_first() {
    let h = TestHarness::new();
    h.memory
        .seed("vendor", &[("vendor_id", SqlValue::Int(1)), ("vendor_nama", SqlValue::from("Konveksi Jaya"))])
        .unwrap();
    h.form("student", "create", &[("nim", "2101"), ("nama", "Budi")]).await;
    h.form("product", "create", &[("vendor_id", "1"), ("nama_baju", "Jaket Himpunan")]).await;
    h.form("admin", "create", &[("admin_nama", "Sari"), ("admin_email", "s@k.id")]).await;

    h.form(
        "preorder",
        "create",
        &[("produk_id", "P001"), ("nim", "2101"), ("tanggal_order", "2024-01-05")],
    )
    .await;
    h.form(
        "preorder",
        "create",
        &[
            ("produk_id", "P001"),
            ("nim", "2101"),
            ("admin_id", "A01"),
            ("tanggal_order", "2024-03-01"),
            ("status_pembayaran", "lunas"),
        ],
    )
    .await;

    let rows = h.rows("preorder").await;
    let ids: Vec<&Value> = rows.iter().map(|r| &r["order_id"]).collect();
    assert_eq!(ids, vec![&json!("O002"), &json!("O001")]);
    assert_eq!(rows[0]["nama_baju"], json!("Jaket Himpunan"));
    assert_eq!(rows[0]["mahasiswa_nama"], json!("Budi"));
    assert_eq!(rows[0]["admin_nama"], json!("Sari"));
    assert_eq!(rows[0]["status_pembayaran"], json!("Lunas"));
    assert_eq!(rows[1]["admin_nama"], Value::Null);

    let products = h.rows("product").await;
    assert_eq!(products[0]["vendor_nama"], json!("Konveksi Jaya"));
}

#[tokio::test]
async fn typed_fields_are_validated() {
    let h = TestHarness::new();
    let (status, body) = h
        .form("product", "create", &[("vendor_id", "1"), ("nama_baju", "Kaos"), ("harga", "murah")])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("invalid harga: must be an integer"));

    let (status, body) = h
        .form("preorder", "create", &[("produk_id", "P001"), ("nim", "1"), ("tanggal_order", "05/01/2024")])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("invalid tanggal_order: must be a date (YYYY-MM-DD)"));

    let (status, body) = h
        .form("preorder", "create", &[("produk_id", "P001"), ("nim", "1"), ("status_pembayaran", "paid")])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("invalid status_pembayaran"));

    let (status, body) = h.form("invoice", "create", &[("order_id", "O001"), ("total_amount", "0")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("invalid total_amount: must be greater than zero"));

    assert!(h.rows("product").await.is_empty());
    assert!(h.rows("preorder").await.is_empty());
    assert!(h.rows("invoice").await.is_empty());
}

#[tokio::test]
async fn invoice_upload_is_stored_under_a_random_name() {
    let h = TestHarness::new();
    let req = MultipartBody::new()
        .text("order_id", "O001")
        .text("total_amount", "150000")
        .text("metode_pembayaran", "Transfer BNI")
        .file("bukti_pembayaran", "bukti transfer.jpg", "image/jpeg", b"\xff\xd8\xff\xe0fake-jpeg")
        .into_request("/admin?entity=invoice&action=create");
    let (status, body) = h.send(req).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"], json!({ "tagihan_id": 1 }));

    let rows = h.rows("tagihan").await;
    assert_eq!(rows.len(), 1);
    let reference = rows[0]["bukti_pembayaran"].as_str().unwrap();
    assert!(Regex::new(r"^uploads/[0-9a-f]{16}\.jpg$").unwrap().is_match(reference), "{}", reference);
    assert_eq!(rows[0]["status_pembayaran"], json!("Belum Bayar"));
    assert_eq!(rows[0]["tanggal_tagihan"], json!(today()));
    assert_eq!(rows[0]["total_amount"], json!(150000));

    let file_name = reference.trim_start_matches("uploads/");
    let stored = std::fs::read(h.upload_dir.join(file_name)).unwrap();
    assert_eq!(stored, b"\xff\xd8\xff\xe0fake-jpeg");
}

#[tokio::test]
async fn invoice_accepts_a_text_reference() {
    let h = TestHarness::new();
    let (status, _) = h
        .form(
            "tagihan",
            "create",
            &[("order_id", "O009"), ("total_amount", "90000"), ("bukti_pembayaran", "uploads/manual.png")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.rows("invoice").await[0]["bukti_pembayaran"], json!("uploads/manual.png"));
    assert!(h.upload_files().is_empty());
}

#[tokio::test]
async fn duplicate_invoice_leaves_no_orphaned_upload() {
    let h = TestHarness::new();
    for expected in [StatusCode::OK, StatusCode::INTERNAL_SERVER_ERROR] {
        let req = MultipartBody::new()
            .text("order_id", "O001")
            .text("total_amount", "150000")
            .file("bukti_pembayaran", "proof.png", "image/png", b"\x89PNG")
            .into_request("/admin?entity=invoice&action=create");
        let (status, body) = h.send(req).await;
        assert_eq!(status, expected, "{}", body);
    }
    assert_eq!(h.rows("invoice").await.len(), 1);
    assert_eq!(h.upload_files().len(), 1);
}

#[tokio::test]
async fn invoice_update_replaces_attachment_and_status() {
    let h = TestHarness::new();
    h.form("invoice", "create", &[("order_id", "O001"), ("total_amount", "50000")]).await;

    let req = MultipartBody::new()
        .text("tagihan_id", "1")
        .text("status_pembayaran", "Menunggu Verifikasi")
        .file("bukti_pembayaran", "proof.pdf", "application/pdf", b"%PDF-1.4")
        .into_request("/admin?entity=invoice&action=update");
    let (status, body) = h.send(req).await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let row = &h.rows("invoice").await[0];
    assert_eq!(row["status_pembayaran"], json!("Menunggu Verifikasi"));
    assert_eq!(row["total_amount"], json!(50000));
    assert!(row["bukti_pembayaran"].as_str().unwrap().ends_with(".pdf"));
}

#[tokio::test]
async fn invoice_update_of_unknown_id_keeps_no_upload() {
    let h = TestHarness::new();
    let req = MultipartBody::new()
        .text("tagihan_id", "999")
        .file("bukti_pembayaran", "proof.jpg", "image/jpeg", b"\xff\xd8\xff")
        .into_request("/admin?entity=invoice&action=update");
    let (status, body) = h.send(req).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], json!("invoice updated"));
    assert!(h.upload_files().is_empty(), "{:?}", h.upload_files());
}

#[tokio::test]
async fn failed_attachment_write_stores_nothing() {
    let h = TestHarness::with_unwritable_uploads();
    let req = MultipartBody::new()
        .text("order_id", "O001")
        .text("total_amount", "150000")
        .file("bukti_pembayaran", "proof.jpg", "image/jpeg", b"\xff\xd8\xff")
        .into_request("/admin?entity=invoice&action=create");
    let (status, body) = h.send(req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"], Value::Null);
    assert!(body["message"].as_str().unwrap().starts_with("upload failed"));
    assert!(h.rows("invoice").await.is_empty());
}

#[tokio::test]
async fn oversized_upload_is_reported_as_such() {
    let h = TestHarness::new();
    let oversized = vec![0u8; common::MAX_BODY_BYTES + 10];
    let req = MultipartBody::new()
        .text("order_id", "O001")
        .text("total_amount", "150000")
        .file("bukti_pembayaran", "huge.jpg", "image/jpeg", &oversized)
        .into_request("/admin?entity=invoice&action=create");
    let (status, body) = h.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("request body exceeds the configured upload size limit"));
    assert!(h.rows("invoice").await.is_empty());
    assert!(h.upload_files().is_empty());
}

#[tokio::test]
async fn invoice_key_must_be_numeric() {
    let h = TestHarness::new();
    let (status, body) = h.form("invoice", "delete", &[("tagihan_id", "abc")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("invalid tagihan_id: must be an integer"));
}

#[tokio::test]
async fn health_and_readiness() {
    let h = TestHarness::new();
    let (status, body) = h.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = h.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], json!("ok"));

    let (_, body) = h.get("/version").await;
    assert_eq!(body["name"], json!("preorder-admin"));
}
