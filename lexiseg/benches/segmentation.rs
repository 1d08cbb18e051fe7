use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use lexiseg::{Dictionary, SegmentationMode, Segmenter, UnitMode};

const DICT_TXT: &str = include_str!("../src/tests/resources/dict.txt");

const TEXT: &str = "山达尔星联邦共和国成立于2024年。你好世界, Hello world! こんにちは世界。";

fn bench_segmentation(c: &mut Criterion) {
    let dict = Dictionary::read_text(DICT_TXT.as_bytes(), UnitMode::AlphaNum).unwrap();
    let segmenter = Segmenter::new(dict).alpha_num(true);
    let text = TEXT.repeat(32);

    let mut group = c.benchmark_group("Segmentation");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("worker/normal", |b| {
        let mut worker = segmenter.new_worker();
        b.iter(|| {
            worker.reset_sentence(&text);
            worker.segment();
            std::hint::black_box(worker.num_tokens());
        })
    });

    group.bench_function("cut/normal", |b| {
        b.iter(|| std::hint::black_box(segmenter.cut(&text, SegmentationMode::Normal)))
    });

    group.bench_function("cut/search", |b| {
        b.iter(|| std::hint::black_box(segmenter.cut(&text, SegmentationMode::Search)))
    });

    group.finish();
}

fn bench_dictionary_load(c: &mut Criterion) {
    let source = DICT_TXT.repeat(64);
    let mut group = c.benchmark_group("DictionaryLoad");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("read_text", |b| {
        b.iter(|| {
            std::hint::black_box(Dictionary::read_text(source.as_bytes(), UnitMode::Char).unwrap())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_segmentation, bench_dictionary_load);
criterion_main!(benches);
