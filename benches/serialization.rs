use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use objchan::io::StrSource;
use objchan::{
    from_str, to_string, to_string_with_attributes, Attributes, Channel, Dump, Error, Field, Load,
    Persist, Result,
};

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Point { x: f64, y: f64 },
    Labelled { x: f64, y: f64, label: String },
    Group { x: f64, y: f64, member: Option<Box<Shape>> },
}

const POINT: &[&str] = &["Point"];
const LABELLED: &[&str] = &["Point", "Labelled"];
const GROUP: &[&str] = &["Point", "Group"];

impl Persist for Shape {
    fn class_name(&self) -> &'static str {
        match self {
            Shape::Point { .. } => "Point",
            Shape::Labelled { .. } => "Labelled",
            Shape::Group { .. } => "Group",
        }
    }

    fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
        match class {
            "Point" => Some(POINT),
            "Labelled" => Some(LABELLED),
            "Group" => Some(GROUP),
            _ => None,
        }
    }

    fn dump<'a>(&'a self, class: &str, dump: &mut Dump<'a, Self>) -> Result<()> {
        match (class, self) {
            ("Point", Shape::Point { x, y })
            | ("Point", Shape::Labelled { x, y, .. })
            | ("Point", Shape::Group { x, y, .. }) => {
                dump.scalar(Field::new("X", *x).comment("Horizontal position"))?;
                dump.scalar(Field::new("Y", *y).comment("Vertical position"))
            }
            ("Labelled", Shape::Labelled { label, .. }) => {
                dump.scalar(Field::new("Label", label.as_str()))
            }
            ("Group", Shape::Group { member, .. }) => match member {
                Some(member) => dump.object(Field::new("Member", &**member)),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn load(class: &str, partial: Option<Self>, load: &mut Load<'_, Self>) -> Result<Self> {
        let (x, y) = match partial {
            None => {
                return Ok(Shape::Point {
                    x: load.read_double("X", 0.0),
                    y: load.read_double("Y", 0.0),
                })
            }
            Some(Shape::Point { x, y }) => (x, y),
            Some(other) => return Err(Error::custom(format!("unexpected base {:?}", other))),
        };
        match class {
            "Labelled" => Ok(Shape::Labelled {
                x,
                y,
                label: load.read_string("Label").unwrap_or_default(),
            }),
            "Group" => Ok(Shape::Group {
                x,
                y,
                member: load.read_object("Member").map(Box::new),
            }),
            _ => Err(Error::custom(format!("unexpected class {}", class))),
        }
    }
}

fn labelled(i: usize) -> Shape {
    Shape::Labelled {
        x: i as f64 * 0.5,
        y: -(i as f64),
        label: format!("shape number {}", i),
    }
}

fn nested(depth: usize) -> Shape {
    let mut shape = labelled(depth);
    for i in 0..depth {
        shape = Shape::Group {
            x: i as f64,
            y: 1.0,
            member: Some(Box::new(shape)),
        };
    }
    shape
}

fn write_all(shapes: &[Shape], attrs: &Attributes) -> String {
    let mut out = String::new();
    {
        let mut channel = Channel::from_sink(&mut out).with_attributes(attrs.clone());
        for shape in shapes {
            channel.write(shape).unwrap();
        }
    }
    out
}

fn benchmark_write_simple(c: &mut Criterion) {
    let shape = labelled(7);
    c.bench_function("write_simple", |b| {
        b.iter(|| to_string(black_box(&shape)).unwrap())
    });
}

fn benchmark_read_simple(c: &mut Criterion) {
    let text = to_string(&labelled(7)).unwrap();
    c.bench_function("read_simple", |b| {
        b.iter(|| from_str::<Shape>(black_box(&text)).unwrap())
    });
}

fn benchmark_write_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_many");
    let attrs = Attributes::new();
    for size in [10, 100, 1000].iter() {
        let shapes: Vec<Shape> = (0..*size).map(labelled).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &shapes, |b, shapes| {
            b.iter(|| write_all(black_box(shapes), &attrs))
        });
    }
    group.finish();
}

fn benchmark_read_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_many");
    for size in [10, 100, 1000].iter() {
        let shapes: Vec<Shape> = (0..*size).map(labelled).collect();
        let text = write_all(&shapes, &Attributes::new());
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| {
                Channel::from_source(StrSource::new(black_box(text)))
                    .read_all::<Shape>()
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn benchmark_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested");
    for depth in [1, 10, 100].iter() {
        let shape = nested(*depth);
        let text = to_string(&shape).unwrap();
        group.bench_with_input(BenchmarkId::new("write", depth), &shape, |b, shape| {
            b.iter(|| to_string(black_box(shape)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("read", depth), &text, |b, text| {
            b.iter(|| from_str::<Shape>(black_box(text)).unwrap())
        });
    }
    group.finish();
}

fn benchmark_comments(c: &mut Criterion) {
    let shapes: Vec<Shape> = (0..100).map(labelled).collect();
    let mut group = c.benchmark_group("comments");
    for (name, attrs) in [
        ("on", Attributes::new()),
        ("off", Attributes::new().with_comment(false)),
    ] {
        group.bench_function(name, |b| b.iter(|| write_all(black_box(&shapes), &attrs)));
    }
    group.finish();
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let shape = nested(5);
    let attrs = Attributes::new().with_comment(false);
    c.bench_function("roundtrip", |b| {
        b.iter(|| {
            let text = to_string_with_attributes(black_box(&shape), attrs.clone()).unwrap();
            from_str::<Shape>(&text).unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_write_simple,
    benchmark_read_simple,
    benchmark_write_many,
    benchmark_read_many,
    benchmark_nested,
    benchmark_comments,
    benchmark_roundtrip
);
criterion_main!(benches);
