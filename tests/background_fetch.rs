use std::io::Cursor;
use std::sync::Arc;

use tiny_http::{Response, Server};
use versecard::{
    BackgroundResolver, BackgroundSpec, Compositor, FixedAdvanceShaper, RenderRequest, Script,
    VerseUnit,
};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let px: Vec<u8> = (0..width * height).flat_map(|_| [90u8, 40, 20, 255]).collect();
    let img = image::RgbaImage::from_raw(width, height, px).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Serve `/bg.png` from a local port; everything else is a 404.
fn spawn_server(png: Vec<u8>) -> String {
    let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
    let addr = server.server_addr();
    let handle = server.clone();
    std::thread::spawn(move || {
        for request in handle.incoming_requests() {
            if request.url() == "/bg.png" {
                let resp = Response::from_data(png.clone()).with_header(
                    "Content-Type: image/png".parse::<tiny_http::Header>().unwrap(),
                );
                let _ = request.respond(resp);
            } else {
                let _ = request.respond(Response::empty(404));
            }
        }
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn remote_png_resolves_with_its_own_dimensions() {
    let base = spawn_server(png_bytes(48, 32));
    let resolver = BackgroundResolver::new();
    let surface = resolver
        .resolve(&BackgroundSpec::RemoteUrl(format!("{base}/bg.png")))
        .await
        .unwrap();
    assert_eq!((surface.width, surface.height), (48, 32));
}

#[tokio::test]
async fn http_error_status_maps_to_image_decode_error() {
    let base = spawn_server(png_bytes(8, 8));
    let resolver = BackgroundResolver::new();
    let err = resolver
        .resolve(&BackgroundSpec::RemoteUrl(format!("{base}/missing.png")))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("image decode error:"));
}

#[tokio::test]
async fn unreachable_host_maps_to_image_decode_error() {
    let resolver = BackgroundResolver::new();
    let err = resolver
        .resolve(&BackgroundSpec::RemoteUrl(
            "http://127.0.0.1:1/bg.png".to_string(),
        ))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("image decode error:"));
}

#[tokio::test]
async fn non_image_body_maps_to_image_decode_error() {
    let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
    let addr = server.server_addr();
    let handle = server.clone();
    std::thread::spawn(move || {
        for request in handle.incoming_requests() {
            let _ = request.respond(Response::from_string("<html>not an image</html>"));
        }
    });

    let resolver = BackgroundResolver::new();
    let err = resolver
        .resolve(&BackgroundSpec::RemoteUrl(format!("http://{addr}/bg.png")))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("image decode error:"));
}

#[tokio::test]
async fn compose_propagates_fetch_failure_without_output() {
    let base = spawn_server(png_bytes(8, 8));
    let mut compositor = Compositor::new(Box::new(FixedAdvanceShaper::default()));
    let request = RenderRequest {
        verse: VerseUnit {
            text: "a verse that would render fine".to_string(),
            script: Script::Latin,
        },
        background: BackgroundSpec::RemoteUrl(format!("{base}/404.png")),
        attribution: "Faiz".to_string(),
        title: None,
    };
    let err = compositor.compose(&request).await.unwrap_err();
    assert!(err.to_string().contains("image decode error:"));
}
