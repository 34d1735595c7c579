//! Static verification site templating.
//!
//! Pure string templating over fixed document shells. Recipient-supplied
//! fields pass through `html_escape` before interpolation; names coming out
//! of a spreadsheet are untrusted text as far as the published site is
//! concerned.

use common::model::certificate::CertificateRecord;
use html_escape::encode_text;

use crate::error::ApiError;
use crate::storage::ContentStore;

/// Per-certificate confirmation card.
pub(super) fn verification_page(record: &CertificateRecord) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Certificate Verification</title>
    <link href="https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css" rel="stylesheet">
</head>
<body class="bg-gray-100 min-h-screen flex items-center justify-center p-4">
    <div class="bg-white rounded-lg shadow-xl p-8 max-w-lg w-full">
        <div class="text-center mb-8">
            <h1 class="text-2xl font-bold text-green-600">Certificate Verified &#10003;</h1>
            <p class="text-gray-500">This certificate is authentic and has been verified.</p>
        </div>
        <div class="mb-6">
            <h2 class="text-xl font-semibold mb-2">Certificate Details</h2>
            <div class="border-t border-b border-gray-200 py-3">
                <div class="flex justify-between py-1">
                    <span class="font-medium text-gray-600">Name:</span>
                    <span>{name}</span>
                </div>
                <div class="flex justify-between py-1">
                    <span class="font-medium text-gray-600">Event:</span>
                    <span>{event}</span>
                </div>
                <div class="flex justify-between py-1">
                    <span class="font-medium text-gray-600">Date:</span>
                    <span>{date}</span>
                </div>
                <div class="flex justify-between py-1">
                    <span class="font-medium text-gray-600">Certificate ID:</span>
                    <span class="text-sm">{id}</span>
                </div>
            </div>
        </div>
        <div class="text-center">
            <a href="index.html" class="text-blue-600 hover:underline">Back to Home</a>
        </div>
    </div>
</body>
</html>
"#,
        name = encode_text(&record.name),
        event = encode_text(&record.event),
        date = encode_text(&record.date),
        id = encode_text(&record.id),
    )
}

/// Shared landing page naming the event the batch was issued for.
pub(super) fn index_page(event: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Certificate Verification System</title>
    <link href="https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css" rel="stylesheet">
</head>
<body class="bg-gray-100 min-h-screen flex items-center justify-center p-4">
    <div class="bg-white rounded-lg shadow-xl p-8 max-w-lg w-full">
        <div class="text-center mb-8">
            <h1 class="text-2xl font-bold text-blue-600">Certificate Verification System</h1>
            <p class="text-gray-500">Scan the QR code on your certificate to verify its authenticity.</p>
        </div>
        <div class="mb-6">
            <p class="text-center text-gray-600">
                This system verifies certificates issued for {event}.
            </p>
        </div>
        <div class="text-center">
            <p class="text-sm text-gray-400">Powered by QR Certificate Generator</p>
        </div>
    </div>
</body>
</html>
"#,
        event = encode_text(event),
    )
}

/// Shared redirect page: reads the `id` query parameter client-side and
/// navigates to `{id}.html`; shows an inline error when it is absent.
pub(super) fn redirect_page() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Verifying Certificate...</title>
    <link href="https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css" rel="stylesheet">
    <script>
        document.addEventListener('DOMContentLoaded', function() {
            const urlParams = new URLSearchParams(window.location.search);
            const certId = urlParams.get('id');

            if (certId) {
                window.location.href = encodeURIComponent(certId) + '.html';
            } else {
                document.getElementById('error-message').style.display = 'block';
            }
        });
    </script>
</head>
<body class="bg-gray-100 min-h-screen flex items-center justify-center p-4">
    <div class="bg-white rounded-lg shadow-xl p-8 max-w-lg w-full">
        <div class="text-center mb-8">
            <h1 class="text-2xl font-bold text-blue-600">Verifying Certificate...</h1>
            <p class="text-gray-500">Please wait while we redirect you to the verification page.</p>
        </div>
        <div id="error-message" class="mb-6 hidden">
            <p class="text-center text-red-600">
                Invalid certificate ID. Please scan the QR code again.
            </p>
        </div>
    </div>
</body>
</html>
"#
}

/// Write the shared index and redirect pages into the batch's publish
/// directory.
pub(super) fn write_shared_pages(
    store: &dyn ContentStore,
    batch_id: &str,
    event: &str,
) -> Result<(), ApiError> {
    store.put(
        &format!("docs/{batch_id}/index.html"),
        index_page(event).as_bytes(),
    )?;
    store.put(
        &format!("docs/{batch_id}/verify.html"),
        redirect_page().as_bytes(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> CertificateRecord {
        CertificateRecord {
            id: "4dc95b9c-7d67-4b6e-a9a1-111111111111".into(),
            name: name.into(),
            event: "RustConf 2026".into(),
            date: "2026-08-07".into(),
            issued_at: "2026-08-07T12:00:00+00:00".into(),
        }
    }

    #[test]
    fn verification_page_embeds_all_display_fields() {
        let html = verification_page(&record("Ada Lovelace"));
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("RustConf 2026"));
        assert!(html.contains("2026-08-07"));
        assert!(html.contains("4dc95b9c-7d67-4b6e-a9a1-111111111111"));
    }

    #[test]
    fn recipient_markup_is_escaped() {
        let html = verification_page(&record("<script>alert('x')</script>"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn index_page_names_the_event_escaped() {
        let html = index_page("Hack & Tell");
        assert!(html.contains("Hack &amp; Tell"));
    }

    #[test]
    fn redirect_page_reads_the_id_parameter() {
        let html = redirect_page();
        assert!(html.contains("URLSearchParams"));
        assert!(html.contains("urlParams.get('id')"));
        assert!(html.contains("error-message"));
    }
}
