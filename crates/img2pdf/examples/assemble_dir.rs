//! Assemble every supported file in a directory into one PDF, in
//! alphabetical order: `cargo run --example assemble_dir -- <dir> <out.pdf>`

use img2pdf::{export_pdf, is_supported, Document, ExportOptions, ImportOptions};

#[tokio::main(flavor = "current_thread")]
async fn main() -> img2pdf::Result<()> {
    let mut args = std::env::args().skip(1);
    let dir = args.next().unwrap_or_else(|| ".".to_string());
    let out = args.next().unwrap_or_else(|| "assembled.pdf".to_string());

    let mut inputs: Vec<_> = std::fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_supported(path))
        .collect();
    inputs.sort();

    let import = ImportOptions::default();
    let mut document = Document::new();
    for path in &inputs {
        let file_index = document.file_count();
        document.import_file(path, &import).await?;
        document.add_all_pages(file_index)?;
        println!(
            "added {} ({} pages)",
            path.display(),
            document.files()[file_index].page_count()
        );
    }

    let written = export_pdf(&document, &out, &ExportOptions::default()).await?;
    println!("{} page(s) → {}", document.page_count(), written.display());
    Ok(())
}
