/// Declare the benchmark table.
///
/// ```ignore
/// define_benchmarks! {
///     "462.libquantum" => "libquantum" {
///         Test {
///             args: [Lit("33"), Lit("5")],
///             output: Stdout("test.out"),
///             expected: "test.out",
///         }
///     }
/// }
/// ```
///
/// `stdin` and `staged` are optional in every variant block.
macro_rules! define_benchmarks {
    (@opt) => { None };
    (@opt $value:literal) => { Some($value) };
    {
        $(
            $id:literal => $exe:literal {
                $(
                    $variant:ident {
                        args: [ $( $arg:expr ),* $(,)? ],
                        $( stdin: $stdin:literal, )?
                        $( staged: [ $( $staged:literal ),* $(,)? ], )?
                        output: $output:expr,
                        expected: $expected:literal $(,)?
                    }
                )+
            }
        )*
    } => {
        pub(super) static ENTRIES: &[BenchmarkEntry] = &[
            $(
                BenchmarkEntry {
                    id: $id,
                    executable: $exe,
                    variants: &[
                        $(
                            (
                                RunVariant::$variant,
                                VariantSpec {
                                    args: &[ $( $arg ),* ],
                                    stdin: define_benchmarks!(@opt $( $stdin )?),
                                    staged: &[ $( $( $staged ),* )? ],
                                    output: $output,
                                    expected: $expected,
                                },
                            ),
                        )+
                    ],
                },
            )*
        ];
    };
}
