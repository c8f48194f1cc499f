//! Single-page PDF output.
//!
//! The page holds one image XObject whose stream is a baseline JPEG
//! (`/DCTDecode`), so the PDF is the JPEG bytes plus a few hundred bytes of
//! object structure. The page is sized at 72 dpi: one point per pixel.

/// Color space of the embedded JPEG stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
}

impl ColorSpace {
    fn pdf_name(self) -> &'static str {
        match self {
            Self::Gray => "/DeviceGray",
            Self::Rgb => "/DeviceRGB",
        }
    }
}

/// Wrap an encoded JPEG in a one-page PDF document.
pub fn wrap_jpeg(jpeg: &[u8], width: u32, height: u32, color_space: ColorSpace) -> Vec<u8> {
    let content = format!("q {width} 0 0 {height} 0 0 cm /Im0 Do Q\n");

    let mut out: Vec<u8> = Vec::with_capacity(jpeg.len() + 1024);
    let mut offsets = Vec::with_capacity(5);

    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    offsets.push(out.len());
    out.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    offsets.push(out.len());
    out.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");

    offsets.push(out.len());
    let page = format!(
        "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width} {height}] \
         /Resources << /XObject << /Im0 4 0 R >> >> /Contents 5 0 R >>\nendobj\n"
    );
    out.extend_from_slice(page.as_bytes());

    offsets.push(out.len());
    let image_header = format!(
        "4 0 obj\n<< /Type /XObject /Subtype /Image /Width {width} /Height {height} \
         /ColorSpace {} /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>\nstream\n",
        color_space.pdf_name(),
        jpeg.len()
    );
    out.extend_from_slice(image_header.as_bytes());
    out.extend_from_slice(jpeg);
    out.extend_from_slice(b"\nendstream\nendobj\n");

    offsets.push(out.len());
    let contents = format!(
        "5 0 obj\n<< /Length {} >>\nstream\n{content}endstream\nendobj\n",
        content.len()
    );
    out.extend_from_slice(contents.as_bytes());

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
    for offset in &offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        offsets.len() + 1
    ));
    out.extend_from_slice(xref.as_bytes());

    out
}
