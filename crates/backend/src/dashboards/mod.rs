pub mod d410_marketing_tests;
