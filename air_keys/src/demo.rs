//! Replays a scripted pinch session against the default layout, without a
//! camera or window.

use std::time::{Duration, Instant};

use air_keys::{
    HandSample, InjectError, KeyInjector, KeyStroke, Keyboard, Layout, LayoutGeometry, TextBuffer,
};

struct PrintInjector;

impl KeyInjector for PrintInjector {
    fn press(&mut self, stroke: KeyStroke) -> Result<(), InjectError> {
        println!("      inject: {}", stroke);
        Ok(())
    }
}

/// Center of the key with this label.
fn over(kb: &Keyboard, label: &str) -> (i32, i32) {
    kb.layout()
        .find(label)
        .map(|id| kb.layout().rect(id).center())
        .unwrap_or((0, 0))
}

fn main() {
    println!("\n=== Air Keys Scripted Session ===\n");

    let layout = match Layout::qwerty(LayoutGeometry::default()) {
        Ok(l)  => l,
        Err(e) => {
            eprintln!("layout error: {}", e);
            std::process::exit(1);
        }
    };
    let mut kb = Keyboard::new(layout, TextBuffer::default());
    let mut inj = PrintInjector;
    let t0 = Instant::now();

    // (description, key label or None for "off the keyboard", pinched, seconds)
    let script: &[(&str, Option<&str>, bool, f64)] = &[
        ("1. hover H, finger open",        Some("H"),     false, 0.0),
        ("2. curl over H",                 Some("H"),     true,  0.1),
        ("3. keep holding H (debounced)",  Some("H"),     true,  0.6),
        ("4. slide to I while curled",     Some("I"),     true,  0.7),
        ("5. open finger",                 Some("I"),     false, 0.8),
        ("6. curl over SPACE",             Some("SPACE"), true,  1.0),
        ("7. hold SPACE past the delay",   Some("SPACE"), true,  2.3),
        ("8. move off the keyboard",       None,          true,  2.4),
        ("9. curl over BACK",              Some("BACK"),  true,  2.5),
        ("10. curl over EXIT",             Some("EXIT"),  true,  2.6),
    ];

    for &(what, label, pinched, secs) in script {
        println!("   {}", what);
        let fingertip = label.map(|l| over(&kb, l)).unwrap_or((5, 5));
        let sample = HandSample { fingertip, pinched };
        let now = t0 + Duration::from_secs_f64(secs);

        match kb.feed(Some(sample), now, &mut inj) {
            Ok(Some(act)) => {
                println!("      Pressed: {}", act.label);
                if act.outcome.is_exit() {
                    println!("      exit requested");
                    break;
                }
            }
            Ok(None) => println!("      (no activation)"),
            Err(e)   => {
                eprintln!("      injection failed: {}", e);
                break;
            }
        }
        println!("      buffer: {:?}", kb.buffer().renderable_text());
    }

    println!("\n   Final text: {:?}\n", kb.buffer().renderable_text());
}
