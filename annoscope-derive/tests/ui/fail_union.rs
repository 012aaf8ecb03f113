use annoscope::Reflect;

#[derive(Reflect)]
#[allow(dead_code)]
union Bits {
    a: u32,
    b: f32,
}

fn main() {}
