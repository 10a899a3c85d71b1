use bookpack::input::{media_xml, text_xml};
use bookpack::pipeline::Pipeline;
use bookpack::refmap::ReferenceMap;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_text_xml(pages: usize, paragraphs_per_page: usize) -> String {
    let mut xml = String::from("<document>\n<fontspec id=\"0\" size=\"12\" family=\"Times\"/>\n");
    for p in 1..=pages {
        xml.push_str(&format!("<page number=\"{}\" width=\"612\" height=\"792\">\n", p));
        for para in 0..paragraphs_per_page {
            let top = 72.0 + para as f32 * 60.0;
            for line in 0..4 {
                xml.push_str(&format!(
                    "<text font=\"0\" left=\"72\" top=\"{}\" width=\"400\" height=\"14\">Line {} of paragraph {} on page {}</text>\n",
                    top + line as f32 * 14.0,
                    line,
                    para,
                    p
                ));
            }
        }
        xml.push_str("</page>\n");
    }
    xml.push_str("</document>");
    xml
}

fn synthetic_media_xml(pages: usize) -> String {
    let mut xml = String::from("<document>\n");
    for p in 1..=pages {
        xml.push_str(&format!("<page index=\"{}\" width=\"595\" height=\"842\">\n", p));
        xml.push_str("</page>\n");
    }
    xml.push_str("</document>");
    xml
}

fn benchmark_full_pipeline_50_pages(c: &mut Criterion) {
    let text_xml_str = synthetic_text_xml(50, 6);
    let media_xml_str = synthetic_media_xml(50);
    let text_doc = text_xml::parse_text_document(&text_xml_str).unwrap();
    let media_doc = media_xml::parse_media_document(&media_xml_str).unwrap();

    c.bench_function("pipeline_run_50_pages", |b| {
        b.iter(|| {
            let refmap = ReferenceMap::new();
            let pipeline = Pipeline::new();
            let result = pipeline.run(black_box(&text_doc), black_box(&media_doc), &refmap);
            black_box(result.unwrap());
        });
    });
}

criterion_group!(benches, benchmark_full_pipeline_50_pages);
criterion_main!(benches);
