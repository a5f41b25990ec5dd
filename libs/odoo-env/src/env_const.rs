// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

pub const ODOO_URL: &str = "ODOO_URL";
pub const ODOO_DATABASE: &str = "ODOO_DATABASE";
pub const ODOO_USER: &str = "ODOO_USER";
pub const ODOO_API_KEY: &str = "ODOO_API_KEY";
pub const ODOO_TIMEOUT_SECS: &str = "ODOO_TIMEOUT_SECS";

/// Log filter, in the same syntax as `RUST_LOG`.
pub const ODOO_OPENAPI_LOG: &str = "ODOO_OPENAPI_LOG";
