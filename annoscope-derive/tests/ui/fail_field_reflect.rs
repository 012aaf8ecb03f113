use annoscope::Reflect;

#[derive(Reflect)]
#[allow(dead_code)]
struct Pair {
    #[reflect(name = "left")]
    a: u8,
}

fn main() {}
