use lc_ladder::prelude::*;
use lc_ladder::circuits::netlist::OUTPUT_NODE;

fn show(spec: &FilterSpec<f64>) -> Result<LadderDesign<f64>> {
    let ladder = design(spec)?;
    println!("{ladder}");
    println!("deviation: {:.3e}\n", ladder.deviation);
    Ok(ladder)
}

fn main() -> Result<()> {
    init_logging(&LogConfig::verbose());

    // 1 kHz, 50 Ω, doubly terminated fifth-order Butterworth.
    let butterworth = FilterSpec::butterworth(5, Cutoff::Hertz(1.0e3), 50.0)?.with_source_resistance();
    let ladder = show(&butterworth)?;

    // 0.5 dB Chebyshev driven from a current source.
    let chebyshev = FilterSpec::chebyshev_db(4, Cutoff::Hertz(1.0e3), 50.0, 0.5)?
        .with_excitation(Excitation::Current);
    show(&chebyshev)?;

    // Cauer ladder for a hand-picked denominator.
    let cauer = FilterSpec::cauer(vec![1.0, 2.0, 3.0, 2.5, 1.0], Cutoff::Radians(1.0), 1.0)?;
    show(&cauer)?;

    // Emit the Butterworth deck, parse it back and solve it at a few frequencies.
    let mut deck = Vec::new();
    ladder.write_netlist(&mut deck)?;
    let text = String::from_utf8_lossy(&deck);
    println!("{text}");

    let parsed = Netlist::parse(&text)?;
    println!("f (Hz), ladder (dB), netlist (dB)");
    for omega in angular_freq_decades(100.0, 10.0e3, 4) {
        let expected = mag_db(ladder.response(omega));
        let solved = solve_ac(&parsed, omega)?
            .voltage(OUTPUT_NODE)
            .map_or(f64::NAN, mag_db);
        println!("{:>10.2}, {expected:>8.3}, {solved:>8.3}", linear_frequency(omega));
    }
    Ok(())
}
