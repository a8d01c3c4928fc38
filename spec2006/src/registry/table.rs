//! Command lines of the supported benchmarks, following the SPEC CPU2006
//! `speccmds.cmd` of each input set.

use super::{
    Arg::{Common, Input, Lit, Staged},
    BenchmarkEntry,
    Output::{Stdout, WorkDir},
    RunVariant, VariantSpec,
};

define_benchmarks! {
    "401.bzip2" => "bzip2" {
        Test {
            args: [Input("input.program"), Lit("5")],
            output: Stdout("input.program.out"),
            expected: "input.program.out",
        }
        Ref {
            args: [Input("input.source"), Lit("280")],
            output: Stdout("input.source.out"),
            expected: "input.source.out",
        }
    }
    "403.gcc" => "gcc" {
        Test {
            args: [Input("cccp.i"), Lit("-o"), Lit("cccp.s")],
            output: WorkDir("cccp.s"),
            expected: "cccp.s",
        }
        Ref {
            args: [Input("166.i"), Lit("-o"), Lit("166.s")],
            output: WorkDir("166.s"),
            expected: "166.s",
        }
    }
    "429.mcf" => "mcf" {
        Test {
            args: [Input("inp.in")],
            output: Stdout("inp.out"),
            expected: "inp.out",
        }
        Ref {
            args: [Input("inp.in")],
            output: Stdout("inp.out"),
            expected: "inp.out",
        }
    }
    "433.milc" => "milc" {
        Test {
            args: [],
            stdin: "su3imp.in",
            output: Stdout("su3imp.out"),
            expected: "su3imp.out",
        }
        Ref {
            args: [],
            stdin: "su3imp.in",
            output: Stdout("su3imp.out"),
            expected: "su3imp.out",
        }
    }
    "444.namd" => "namd" {
        Test {
            args: [
                Lit("--input"), Common("namd.input"),
                Lit("--iterations"), Lit("1"),
                Lit("--output"), Lit("namd.out"),
            ],
            output: WorkDir("namd.out"),
            expected: "namd.out",
        }
        Ref {
            args: [
                Lit("--input"), Common("namd.input"),
                Lit("--iterations"), Lit("38"),
                Lit("--output"), Lit("namd.out"),
            ],
            output: WorkDir("namd.out"),
            expected: "namd.out",
        }
    }
    "450.soplex" => "soplex" {
        Test {
            args: [Lit("-m10000"), Input("test.mps")],
            output: Stdout("test.out"),
            expected: "test.out",
        }
        Ref {
            args: [Lit("-s1"), Lit("-e"), Lit("-m45000"), Input("pds-50.mps")],
            output: Stdout("pds-50.mps.out"),
            expected: "pds-50.mps.out",
        }
    }
    "453.povray" => "povray" {
        Test {
            args: [Staged("SPEC-benchmark-test.ini")],
            staged: ["SPEC-benchmark-test.ini", "SPEC-benchmark-test.pov"],
            output: WorkDir("SPEC-benchmark.log"),
            expected: "SPEC-benchmark.log",
        }
        Ref {
            args: [Staged("SPEC-benchmark-ref.ini")],
            staged: ["SPEC-benchmark-ref.ini", "SPEC-benchmark-ref.pov"],
            output: WorkDir("SPEC-benchmark.log"),
            expected: "SPEC-benchmark.log",
        }
    }
    "456.hmmer" => "hmmer" {
        Test {
            args: [
                Lit("--fixed"), Lit("0"), Lit("--mean"), Lit("325"),
                Lit("--num"), Lit("45000"), Lit("--sd"), Lit("200"),
                Lit("--seed"), Lit("0"), Input("bombesin.hmm"),
            ],
            output: Stdout("bombesin.out"),
            expected: "bombesin.out",
        }
        Ref {
            args: [Input("nph3.hmm"), Input("swiss41")],
            output: Stdout("nph3.out"),
            expected: "nph3.out",
        }
    }
    "458.sjeng" => "sjeng" {
        Test {
            args: [Input("test.txt")],
            output: Stdout("test.out"),
            expected: "test.out",
        }
        Ref {
            args: [Input("ref.txt")],
            output: Stdout("ref.out"),
            expected: "ref.out",
        }
    }
    "462.libquantum" => "libquantum" {
        Test {
            args: [Lit("33"), Lit("5")],
            output: Stdout("test.out"),
            expected: "test.out",
        }
        Ref {
            args: [Lit("1397"), Lit("8")],
            output: Stdout("ref.out"),
            expected: "ref.out",
        }
    }
    "470.lbm" => "lbm" {
        Test {
            args: [Lit("20"), Lit("reference.dat"), Lit("0"), Lit("1"), Input("100_100_130_cf_a.of")],
            output: Stdout("lbm.out"),
            expected: "lbm.out",
        }
        Ref {
            args: [Lit("3000"), Lit("reference.dat"), Lit("0"), Lit("0"), Input("100_100_130_ldc.of")],
            output: Stdout("lbm.out"),
            expected: "lbm.out",
        }
    }
    "473.astar" => "astar" {
        Test {
            args: [Staged("lake.cfg")],
            staged: ["lake.cfg", "lake.bin"],
            output: Stdout("lake.out"),
            expected: "lake.out",
        }
        Ref {
            args: [Staged("BigLakes2048.cfg")],
            staged: ["BigLakes2048.cfg", "BigLakes2048.bin"],
            output: Stdout("BigLakes2048.out"),
            expected: "BigLakes2048.out",
        }
    }
    "483.xalancbmk" => "Xalan" {
        Test {
            args: [Lit("-v"), Input("test.xml"), Input("xalanc.xsl")],
            output: Stdout("test.out"),
            expected: "test.out",
        }
        Ref {
            args: [Lit("-v"), Input("t5.xml"), Input("xalanc.xsl")],
            output: Stdout("ref.out"),
            expected: "ref.out",
        }
    }
    // specrand gets the same seeds for every input set
    "998.specrand" => "specrand" {
        Test {
            args: [Lit("324342"), Lit("24239")],
            output: Stdout("rand.24239.out"),
            expected: "rand.24239.out",
        }
        Ref {
            args: [Lit("324342"), Lit("24239")],
            output: Stdout("rand.24239.out"),
            expected: "rand.24239.out",
        }
    }
    "999.specrand" => "specrand" {
        Test {
            args: [Lit("324342"), Lit("24239")],
            output: Stdout("rand.24239.out"),
            expected: "rand.24239.out",
        }
        Ref {
            args: [Lit("324342"), Lit("24239")],
            output: Stdout("rand.24239.out"),
            expected: "rand.24239.out",
        }
    }
}
